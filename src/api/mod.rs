// Third-party API clients module
pub mod fortnite;
pub mod llm;
pub mod twitch;
