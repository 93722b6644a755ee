pub mod add;
pub mod completions;
pub mod export;
pub mod list;
pub mod login;
pub mod logout;
pub mod remove;
pub mod show;
pub mod status;
pub mod update;
