mod alerts;
mod login;
mod teams;

pub use alerts::AlertsPage;
pub use login::Login;
pub use teams::TeamsPage;
