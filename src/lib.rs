pub mod appsettings;
pub mod conversation;
pub mod reminder;
pub mod scheduling;
pub mod storage;
pub mod telegram;
pub mod time_parser;
