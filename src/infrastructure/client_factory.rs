use crate::application::services::HttpClient;
use crate::domain::entities::RedirectPolicy;
use crate::infrastructure::http_client::HyperHttpClient;
use crate::infrastructure::timing::TimingClient;

/// Transport settings taken from the command's options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    pub redirect_policy: RedirectPolicy,
    pub max_idle_connections: usize,
    pub report_timing: bool,
}

impl ClientOptions {
    pub fn new(disable_redirect: bool, max_redirects: usize, max_idle_connections: usize) -> Self {
        let redirect_policy = if disable_redirect {
            RedirectPolicy::Blocked
        } else {
            RedirectPolicy::Follow { max_redirects }
        };
        Self {
            redirect_policy,
            max_idle_connections,
            report_timing: false,
        }
    }

    pub fn report_timing(mut self, enabled: bool) -> Self {
        self.report_timing = enabled;
        self
    }
}

pub struct ClientFactory;

impl ClientFactory {
    pub fn make_client(options: &ClientOptions) -> Box<dyn HttpClient> {
        let transport =
            HyperHttpClient::new(options.redirect_policy, options.max_idle_connections);

        if options.report_timing {
            Box::new(TimingClient::new(Box::new(transport)))
        } else {
            Box::new(transport)
        }
    }
}
