use crate::error::FlowError;
use serenity::all::UserId;
use std::collections::HashMap;

/// Conversational style wrapping a user's message before it reaches the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    Censored,
    #[default]
    Friendly,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Censored, Mode::Friendly];

    /// Label users type to pick this mode
    pub fn label(self) -> &'static str {
        match self {
            Mode::Censored => "Censuré",
            Mode::Friendly => "Sympa",
        }
    }

    /// Accepts the label in any casing, with surrounding whitespace.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize(raw);
        Self::ALL
            .into_iter()
            .find(|mode| mode.label() == normalized)
    }

    /// Wrap the user's text in this mode's instructions.
    pub fn wrap(self, text: &str) -> String {
        match self {
            Mode::Censored => format!("Réponds de manière directe et crue, sans filtre: {}", text),
            Mode::Friendly => format!(
                "Réponds de manière amicale mais sans censure, en utilisant des expressions cool: {}",
                text
            ),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Trim, then title-case: the first letter of each run of letters is upper-cased and the rest of
/// the run lower-cased.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_word = false;
    for c in raw.trim().chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                // Some letters upper-case to several chars (`ß` → `SS`); only the first stays
                // upper, otherwise a second pass would lower-case the tail.
                let mut upper = c.to_uppercase();
                out.extend(upper.next());
                out.extend(upper.flat_map(char::to_lowercase));
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Per-user mode selection.  Last write wins.
pub trait ModeStore: Send + Sync {
    /// Record `raw` as `user`'s mode if it names a recognized mode.  On failure the previous
    /// selection, if any, is kept.
    fn set_mode(&mut self, user: UserId, raw: &str) -> Result<Mode, FlowError>;

    fn selected(&self, user: UserId) -> Option<Mode>;

    fn get_mode(&self, user: UserId) -> Mode {
        self.selected(user).unwrap_or_default()
    }
}

#[derive(Default)]
pub struct MemoryModeStore(HashMap<UserId, Mode>);

impl MemoryModeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModeStore for MemoryModeStore {
    fn set_mode(&mut self, user: UserId, raw: &str) -> Result<Mode, FlowError> {
        let mode = Mode::parse(raw).ok_or(FlowError::InvalidMode)?;
        self.0.insert(user, mode);
        Ok(mode)
    }

    fn selected(&self, user: UserId) -> Option<Mode> {
        self.0.get(&user).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_title_cases() {
        assert_eq!(normalize("  sympa  "), "Sympa");
        assert_eq!(normalize("cENSURÉ"), "Censuré");
        assert_eq!(normalize("très sympa"), "Très Sympa");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn normalize_keeps_one_capital_for_expanding_letters() {
        assert_eq!(normalize("ß"), "Ss");
        assert_eq!(normalize("STRASSE straße"), "Strasse Straße");
        assert_eq!(normalize("ﬁn"), "Fin");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in [
            "  sympa", "CENSURÉ ", "bIzArRe", "a-b c", "  ", "Sympa", "l'ami", "ß", "straße", "ﬁn",
        ] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "input {:?}", raw);
        }
    }

    #[test]
    fn only_two_labels_parse() {
        assert_eq!(Mode::parse("sympa"), Some(Mode::Friendly));
        assert_eq!(Mode::parse(" Censuré\n"), Some(Mode::Censored));
        assert_eq!(Mode::parse("censure"), None);
        assert_eq!(Mode::parse("bizarre"), None);
        assert_eq!(Mode::parse("sympa censuré"), None);
    }

    #[test]
    fn default_mode_is_friendly() {
        let store = MemoryModeStore::new();
        assert_eq!(store.selected(UserId::new(3)), None);
        assert_eq!(store.get_mode(UserId::new(3)), Mode::Friendly);
    }

    #[test]
    fn invalid_mode_keeps_previous_selection() {
        let mut store = MemoryModeStore::new();
        let user = UserId::new(3);

        assert_eq!(store.set_mode(user, "bizarre"), Err(FlowError::InvalidMode));
        assert_eq!(store.selected(user), None);

        assert_eq!(store.set_mode(user, "censuré"), Ok(Mode::Censored));
        assert_eq!(store.set_mode(user, "bizarre"), Err(FlowError::InvalidMode));
        assert_eq!(store.get_mode(user), Mode::Censored);
    }

    #[test]
    fn last_write_wins() {
        let mut store = MemoryModeStore::new();
        let user = UserId::new(3);
        store.set_mode(user, "Censuré").unwrap();
        store.set_mode(user, "Sympa").unwrap();
        assert_eq!(store.get_mode(user), Mode::Friendly);
    }

    #[test]
    fn templates_embed_user_text() {
        let wrapped = Mode::Friendly.wrap("Bonjour");
        assert!(wrapped.contains("expressions cool"));
        assert!(wrapped.ends_with("Bonjour"));

        let wrapped = Mode::Censored.wrap("Bonjour");
        assert!(wrapped.contains("sans filtre"));
        assert!(wrapped.ends_with("Bonjour"));
    }
}
