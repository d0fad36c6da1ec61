pub mod evict;
pub mod hash;
pub mod run;
pub mod status;
pub mod verify;
