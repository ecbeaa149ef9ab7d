pub mod health;
pub mod internal_auth;
pub mod internal_rooms;
pub mod matchmaking;
pub mod rooms;
