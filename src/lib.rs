pub mod cli_args;
pub mod error;
mod extractor;
mod middleware;
pub mod record;
mod route;
pub mod search;
pub mod server;
mod state;
pub mod upstream;

#[cfg(test)]
mod test;
