/// Application name
pub const APP_NAME: &str = "Huddle";

/// Default base URL of the remote messaging API
pub const DEFAULT_API_URL: &str = "https://slack.com/api";

/// Conversation list with unread counters and last-message summaries
pub const PATH_CONVERSATION_COUNTS: &str = "/users.counts";

/// Paginated message history of one conversation
pub const PATH_CONVERSATION_HISTORY: &str = "/conversations.history";

/// Open (or reuse) a direct conversation
pub const PATH_CONVERSATION_OPEN: &str = "/conversations.open";

/// Move the read marker of a conversation
pub const PATH_CONVERSATION_MARK: &str = "/conversations.mark";

/// Full metadata of one conversation
pub const PATH_CONVERSATION_INFO: &str = "/conversations.info";

/// Paginated member ids of one conversation
pub const PATH_CONVERSATION_MEMBERS: &str = "/conversations.members";

/// Member ids requested per page
pub const MEMBERS_PAGE_SIZE: u32 = 100;

/// Messages requested when looking up the latest message of a chat
pub const LAST_MESSAGE_LIMIT: u32 = 1;

/// How long a typing signal stays visible, in milliseconds
pub const TYPING_TIMEOUT_MS: u64 = 5000;

/// Cursor sentinel meaning "no further pages"
pub const END_CURSOR: &str = "end";
