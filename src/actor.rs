/// Name suffixes GitHub gives to non-human identities.
const BOT_MARKER: &str = "[bot]";
const APP_MARKER: &str = "[app]";

/// Categorises the actor recorded on a rule suite.
///
/// This is a naming heuristic. A service account that authenticates as a
/// regular user is classified as [`ActorKind::Human`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    Human,
    Bot,
    App,
}

impl ActorKind {
    pub fn from_name(name: &str) -> Self {
        if name.contains(BOT_MARKER) {
            ActorKind::Bot
        } else if name.contains(APP_MARKER) {
            ActorKind::App
        } else {
            ActorKind::Human
        }
    }

    pub fn is_automated(&self) -> bool {
        matches!(self, ActorKind::Bot | ActorKind::App)
    }
}

impl std::fmt::Display for ActorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorKind::Human => write!(f, "human"),
            ActorKind::Bot => write!(f, "bot"),
            ActorKind::App => write!(f, "app"),
        }
    }
}

/// Returns true when `actor_name` carries the bot or app marker.
pub fn is_automated_actor(actor_name: &str) -> bool {
    ActorKind::from_name(actor_name).is_automated()
}
