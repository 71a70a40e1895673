use std::env;
use std::fmt;

/// The three deployable services.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceKind {
    Auth,
    University,
    EmploymentOffice,
}

impl ServiceKind {
    pub fn default_port(self) -> u16 {
        match self {
            ServiceKind::University => 8081,
            ServiceKind::EmploymentOffice => 8082,
            ServiceKind::Auth => 8083,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ServiceKind::Auth => "eadmin-auth",
            ServiceKind::University => "eadmin-university",
            ServiceKind::EmploymentOffice => "eadmin-employment-office",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env(kind: ServiceKind) -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(|| kind.default_port()),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ports() {
        assert_eq!(ServiceKind::University.default_port(), 8081);
        assert_eq!(ServiceKind::EmploymentOffice.default_port(), 8082);
        assert_eq!(ServiceKind::Auth.default_port(), 8083);
    }
}
