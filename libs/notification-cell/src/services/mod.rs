pub mod dispatcher;
pub mod sender;
pub mod templates;

pub use dispatcher::spawn_dispatcher;
pub use sender::{LogSender, NotificationSender};
pub use templates::render_message;
