//! Command-line front end: the presentation layer for the access core.
//! Parses one command, consults the guard/policy, talks to the backend through
//! `ApiClient`, and turns auth outcomes into the same redirects and notices the
//! web client shows.

pub mod outputformatter;

use serde_json::Value;

use crate::bmi;
use crate::contact::ContactForm;
use crate::error::{AppError, AppResult};
use crate::identity::{guard_named, page_endpoints, visible_nav, Role, RouteId};
use crate::remote::{ApiClient, RegisterRequest};

pub const USAGE: &str = "Usage:
  curo login <email> <password>
  curo register <name> <email> <password> <admin|doctor|patient>
  curo logout
  curo status                 show the stored session
  curo whoami                 fetch the signed-in user's profile
  curo nav                    list the sections visible to the current role
  curo open <route>           run the access check for a route, then load the page's data
  curo get <path>             authenticated GET; arrays print as tables
  curo delete <path>
  curo post <path> <json>
  curo patch <path> <json>
  curo bmi <weight_kg> <height_m>
  curo contact <first> <last> <email> <phone> <message> [--agree]

Environment:
  CURO_API_URL       backend base URL (default http://localhost:8081)
  CURO_SESSION_FILE  session record location (default .curo/session.json)
  RUST_LOG           log filter (default info)";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { email: String, password: String },
    Register { name: String, email: String, password: String, role: Role },
    Logout,
    Status,
    WhoAmI,
    Nav,
    Open { route: String },
    Get { path: String },
    Delete { path: String },
    Post { path: String, body: Value },
    Patch { path: String, body: Value },
    Bmi { weight: Option<f64>, height: Option<f64> },
    Contact(ContactForm),
    Help,
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Command, String> {
        let a: Vec<&str> = args.iter().map(String::as_str).collect();
        let cmd = match a.as_slice() {
            [] | ["help"] | ["-h"] | ["--help"] => Command::Help,
            ["login", email, password] => Command::Login { email: email.to_string(), password: password.to_string() },
            ["register", name, email, password, role] => Command::Register {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                role: Role::parse(role),
            },
            ["logout"] => Command::Logout,
            ["status"] => Command::Status,
            ["whoami"] => Command::WhoAmI,
            ["nav"] => Command::Nav,
            ["open", route] => Command::Open { route: route.to_string() },
            ["get", path] => Command::Get { path: path.to_string() },
            ["delete", path] => Command::Delete { path: path.to_string() },
            ["post", path, body] => Command::Post { path: path.to_string(), body: parse_body(body)? },
            ["patch", path, body] => Command::Patch { path: path.to_string(), body: parse_body(body)? },
            ["bmi", weight, height] => Command::Bmi { weight: weight.parse().ok(), height: height.parse().ok() },
            ["contact", first, last, email, phone, message, rest @ ..] if matches!(rest, [] | ["--agree"]) => {
                Command::Contact(ContactForm {
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    email: email.to_string(),
                    phone: phone.to_string(),
                    message: message.to_string(),
                    agree: !rest.is_empty(),
                })
            }
            [other, ..] => return Err(format!("unknown or incomplete command '{}'", other)),
        };
        Ok(cmd)
    }
}

fn parse_body(s: &str) -> Result<Value, String> {
    serde_json::from_str(s).map_err(|e| format!("request body is not valid JSON: {}", e))
}

/// Run one command. Output goes to stdout; the returned error is what the caller
/// reports (and whether it redirects to login).
pub async fn execute(client: &ApiClient, cmd: Command) -> AppResult<()> {
    match cmd {
        Command::Help => println!("{}", USAGE),
        Command::Login { email, password } => {
            let outcome = client.login(&email, &password).await?;
            println!("logged in as {} ({})", outcome.role, outcome.role.description());
            println!("redirect: {}", outcome.landing.path());
        }
        Command::Register { name, email, password, role } => {
            client.register(&RegisterRequest { name, email, password, role }).await?;
            println!("registered");
            println!("redirect: {}", RouteId::Login.path());
        }
        Command::Logout => {
            client.logout();
            println!("redirect: {}", RouteId::Login.path());
        }
        Command::Status => {
            let s = client.sessions().current();
            if client.sessions().persisted()? != s {
                println!("note: the stored session changed since this process started");
            }
            if s.is_authenticated() {
                println!("{} ({}) at {}", s.role(), s.role().description(), client.base());
            } else {
                println!("{} (not signed in)", Role::None.description());
            }
        }
        Command::WhoAmI => {
            let user = client.current_user().await?;
            outputformatter::print_value(&user);
        }
        Command::Nav => {
            let nav = visible_nav(client.sessions().current().role());
            for entry in &nav {
                println!("{:<14} {:<14} [{}]", entry.label, entry.path, entry.icon);
            }
        }
        Command::Open { route } => {
            let session = client.sessions().current();
            guard_named(&session, &route).into_result()?;
            if let Some(id) = RouteId::parse(&route) {
                println!("allow: {} ({})", id.name(), id.path());
                for endpoint in page_endpoints(session.role(), id) {
                    let v: Value = client.get_json(endpoint).await?;
                    outputformatter::print_value(&v);
                }
            }
        }
        Command::Get { path } => {
            let v: Value = client.get_json(&path).await?;
            outputformatter::print_value(&v);
        }
        Command::Delete { path } => {
            let v = client.delete(&path).await?;
            outputformatter::print_value(&v);
        }
        Command::Post { path, body } => {
            let v: Value = client.post_json(&path, &body).await?;
            outputformatter::print_value(&v);
        }
        Command::Patch { path, body } => {
            let v: Value = client.patch_json(&path, &body).await?;
            outputformatter::print_value(&v);
        }
        Command::Bmi { weight, height } => println!("{}", bmi::calculate(weight, height)?),
        Command::Contact(form) => println!("{}", form.submit()?),
    }
    Ok(())
}

/// What the user sees for a failed command.
pub fn render_error(err: &AppError) -> String {
    match err {
        AppError::Forbidden { message, .. } => message.clone(),
        e if e.redirects_to_login() => format!("{}\nredirect: {}", e.message(), RouteId::Login.path()),
        e => format!("error: {}", e.message()),
    }
}
