//! The five generated tables.

use crate::{
    event_generator::EventRecord, experiment_generator::ExperimentAssignmentRecord,
    subscription_generator::SubscriptionRecord, survey_generator::SurveyResponseRecord,
    types::Table, user_generator::UserRecord,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Users,
    Subscriptions,
    Events,
    SurveyResponses,
    ExperimentAssignments,
}

impl TableKind {
    /// Persistence order.
    pub const ALL: [TableKind; 5] = [
        Self::Users,
        Self::Subscriptions,
        Self::Events,
        Self::SurveyResponses,
        Self::ExperimentAssignments,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Subscriptions => "subscriptions",
            Self::Events => "events",
            Self::SurveyResponses => "survey_responses",
            Self::ExperimentAssignments => "experiment_assignments",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.csv", self.name())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub users: Table<UserRecord>,
    pub subscriptions: Table<SubscriptionRecord>,
    pub events: Table<EventRecord>,
    pub surveys: Table<SurveyResponseRecord>,
    pub experiments: Table<ExperimentAssignmentRecord>,
}

impl Dataset {
    pub fn row_count(&self, kind: TableKind) -> usize {
        match kind {
            TableKind::Users => self.users.len(),
            TableKind::Subscriptions => self.subscriptions.len(),
            TableKind::Events => self.events.len(),
            TableKind::SurveyResponses => self.surveys.len(),
            TableKind::ExperimentAssignments => self.experiments.len(),
        }
    }

    /// `(table name, rows)` in persistence order.
    pub fn row_counts(&self) -> Vec<(&'static str, usize)> {
        TableKind::ALL
            .iter()
            .map(|k| (k.name(), self.row_count(*k)))
            .collect()
    }
}
