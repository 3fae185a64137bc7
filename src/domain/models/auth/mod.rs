pub mod authenticated_session;

pub use authenticated_session::AuthenticatedSession;
