pub mod analysis;
pub mod chat;
pub mod home;
pub mod login;
pub mod profile;
pub mod register;
pub mod schemes;
pub mod shared;
pub mod weather;

pub use analysis::AnalysisView;
pub use chat::ChatView;
pub use home::HomeView;
pub use login::LoginView;
pub use profile::ProfileView;
pub use register::RegisterView;
pub use schemes::SchemesView;
pub use weather::WeatherView;
