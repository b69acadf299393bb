pub mod server;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        provider_url: String,
        token_url: String,
        debug_errors: bool,
    },
}
