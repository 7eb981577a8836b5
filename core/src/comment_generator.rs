//! Deterministic free-text survey comments from a curated word list.
//!
//! Same stream = same comments. Sentences are word salad on purpose;
//! they only need to look like typed feedback.

use crate::rng::StreamRng;

pub struct CommentGenerator;

impl CommentGenerator {
    /// A sentence of roughly `nb_words` words (±40%), capitalized and
    /// ending in a period.
    pub fn sentence(rng: &mut StreamRng, nb_words: usize) -> String {
        let spread = (nb_words as f64 * 0.4).round() as i64;
        let count = (nb_words as i64 + rng.range_inclusive(-spread, spread)).max(1) as usize;

        let words: Vec<&str> = (0..count).map(|_| *rng.pick(Self::words())).collect();
        let mut sentence = words.join(" ");
        if let Some(first) = sentence.get(..1) {
            let upper = first.to_uppercase();
            sentence.replace_range(..1, &upper);
        }
        sentence.push('.');
        sentence
    }

    fn words() -> &'static [&'static str] {
        &[
            "app", "account", "again", "always", "annoying", "answer", "billing", "bug",
            "button", "cancel", "change", "charged", "cheap", "clear", "confusing", "crash",
            "daily", "dashboard", "design", "easy", "email", "error", "every", "expected",
            "experience", "fast", "feature", "feedback", "find", "fine", "fix", "free",
            "friend", "great", "hard", "help", "home", "issue", "keeps", "late", "layout",
            "less", "like", "load", "login", "love", "menu", "more", "never", "new",
            "nice", "notification", "offline", "often", "option", "page", "password",
            "pay", "paywall", "phone", "plan", "please", "premium", "price", "quick",
            "really", "recommend", "refund", "reminder", "report", "screen", "search",
            "session", "settings", "setup", "simple", "slow", "smooth", "sometimes",
            "support", "sync", "tablet", "team", "time", "trial", "update", "upgrade",
            "use", "useful", "value", "version", "wait", "want", "week", "work", "worth",
            "would", "yearly",
        ]
    }
}
