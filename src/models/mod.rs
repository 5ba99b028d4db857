pub mod constants;
pub mod event;
pub mod event_participant;
pub mod event_type;
pub mod user;
pub mod view;

pub use event::{Event, EventChanges, NewEvent};
pub use event_participant::EventParticipant;
pub use event_type::EventType;
pub use user::User;
