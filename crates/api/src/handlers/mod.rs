pub mod entities;
pub mod prefs;
pub mod tags;
