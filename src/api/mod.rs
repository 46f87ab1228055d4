mod client;

pub use client::NewsApi;
