// src/scrape/mod.rs
mod contact;
mod lookup;
mod portal;
mod requests;
mod search;
mod transaction;
pub mod links;

pub use contact::ContactInput;
pub use links::{ Clock, IntervalLimiter, LinkResolutionCache, ManualClock, RateLimiter, SystemClock };
pub use portal::Portal;
pub use search::{ SearchIpv4, SearchIpv6 };
