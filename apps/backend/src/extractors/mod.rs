pub mod acting_user;
pub mod path_ids;
pub mod validated_json;

pub use acting_user::ActingUser;
pub use path_ids::{MatchId, SessionId};
pub use validated_json::ValidatedJson;
