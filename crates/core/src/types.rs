/// Remote object identifiers. The monitoring API serialises ids as decimal
/// strings; internally they are 64-bit integers.
pub type EntityId = i64;
