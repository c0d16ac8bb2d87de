pub mod db;
pub mod game;
pub mod oracle;
pub mod redis;
