mod client;
mod export;
