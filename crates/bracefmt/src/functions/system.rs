//! Process and environment functions.
//!
//! These read the environment at call time and never fail because of it:
//! anything that cannot be determined yields an empty string (or the
//! loopback address for `ip`).

use std::io;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use tracing::debug;

use crate::error::Result;
use crate::value::Value;

use super::{arity, string_arg, Builtin};

pub(crate) const FUNCTIONS: &[(&str, Builtin)] = &[
    ("env", env),
    ("expand", expand),
    ("user", user),
    ("hostname", hostname),
    ("executable", executable),
    ("cwd", cwd),
    ("pid", pid),
    ("ppid", ppid),
    ("uid", uid),
    ("gid", gid),
    ("euid", euid),
    ("egid", egid),
    ("ip", ip),
];

/// Connecting a UDP socket sends nothing; it only selects the local address
/// that would route to this peer.
const OUTBOUND_PEER: &str = "8.8.8.8:80";

fn var(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}

/// Replaces `$NAME` and `${NAME}` with `lookup(NAME)`.
pub fn expand_with(text: &str, lookup: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(i) = rest.find('$') {
        out.push_str(&rest[..i]);
        let after = &rest[i + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            if let Some(end) = braced.find('}') {
                out.push_str(&lookup(&braced[..end]));
                rest = &braced[end + 1..];
                continue;
            }
        }

        let len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        if len == 0 {
            out.push('$');
        } else {
            out.push_str(&lookup(&after[..len]));
        }
        rest = &after[len..];
    }

    out.push_str(rest);
    out
}

fn env(args: &[Value]) -> Result<Value> {
    let [name] = arity::<1>("env", args)?;
    Ok(Value::from(var(string_arg("env", name)?)))
}

fn expand(args: &[Value]) -> Result<Value> {
    let [text] = arity::<1>("expand", args)?;
    Ok(Value::from(expand_with(string_arg("expand", text)?, var)))
}

fn user(args: &[Value]) -> Result<Value> {
    arity::<0>("user", args)?;
    let name = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_default();
    Ok(Value::from(name))
}

fn hostname(args: &[Value]) -> Result<Value> {
    arity::<0>("hostname", args)?;
    let name = std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .or_else(|_| std::fs::read_to_string("/etc/hostname"))
        .map(|name| name.trim().to_string())
        .unwrap_or_default();
    Ok(Value::from(name))
}

fn executable(args: &[Value]) -> Result<Value> {
    arity::<0>("executable", args)?;
    let path = std::env::current_exe()
        .map(|path| path.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Value::from(path))
}

fn cwd(args: &[Value]) -> Result<Value> {
    arity::<0>("cwd", args)?;
    let path = std::env::current_dir()
        .map(|path| path.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Value::from(path))
}

fn pid(args: &[Value]) -> Result<Value> {
    arity::<0>("pid", args)?;
    Ok(Value::from(std::process::id()))
}

#[cfg(unix)]
fn parent_pid() -> i64 {
    i64::from(std::os::unix::process::parent_id())
}

#[cfg(not(unix))]
fn parent_pid() -> i64 {
    -1
}

fn ppid(args: &[Value]) -> Result<Value> {
    arity::<0>("ppid", args)?;
    Ok(Value::Int(parent_pid()))
}

/// User and group ids of the process; `-1` where the platform has none.
#[cfg(unix)]
mod ids {
    // getuid and friends are always successful
    pub(super) fn uid() -> i64 {
        i64::from(unsafe { libc::getuid() })
    }

    pub(super) fn gid() -> i64 {
        i64::from(unsafe { libc::getgid() })
    }

    pub(super) fn euid() -> i64 {
        i64::from(unsafe { libc::geteuid() })
    }

    pub(super) fn egid() -> i64 {
        i64::from(unsafe { libc::getegid() })
    }
}

#[cfg(not(unix))]
mod ids {
    pub(super) fn uid() -> i64 {
        -1
    }

    pub(super) fn gid() -> i64 {
        -1
    }

    pub(super) fn euid() -> i64 {
        -1
    }

    pub(super) fn egid() -> i64 {
        -1
    }
}

macro_rules! id_functions {
    ($($name:ident),*) => {
        $(
            fn $name(args: &[Value]) -> Result<Value> {
                arity::<0>(stringify!($name), args)?;
                Ok(Value::Int(ids::$name()))
            }
        )*
    };
}

id_functions!(uid, gid, euid, egid);

fn outbound_address() -> io::Result<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect(OUTBOUND_PEER)?;
    Ok(socket.local_addr()?.ip())
}

fn address_or_loopback(address: io::Result<IpAddr>) -> String {
    match address {
        Ok(address) if !address.is_unspecified() => address.to_string(),
        Ok(_) => Ipv4Addr::LOCALHOST.to_string(),
        Err(e) => {
            debug!(error = %e, "no outbound address, using loopback");
            Ipv4Addr::LOCALHOST.to_string()
        }
    }
}

fn ip(args: &[Value]) -> Result<Value> {
    arity::<0>("ip", args)?;
    Ok(Value::from(address_or_loopback(outbound_address())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> String {
        match name {
            "HOME" => "/home/me".to_string(),
            "X_Y" => "xy".to_string(),
            _ => String::new(),
        }
    }

    #[test]
    fn test_expand() {
        assert_eq!(expand_with("$HOME/bin", lookup), "/home/me/bin");
        assert_eq!(expand_with("${HOME}bin", lookup), "/home/mebin");
        assert_eq!(expand_with("a$X_Y.b", lookup), "axy.b");
        assert_eq!(expand_with("$MISSING|", lookup), "|");
        assert_eq!(expand_with("cost: 5$", lookup), "cost: 5$");
        assert_eq!(expand_with("${HOME", lookup), "${HOME");
        assert_eq!(expand_with("plain", lookup), "plain");
    }

    #[test]
    fn test_address_fallback() {
        let err = io::Error::new(io::ErrorKind::Other, "unreachable");
        assert_eq!(address_or_loopback(Err(err)), "127.0.0.1");
        assert_eq!(
            address_or_loopback(Ok(IpAddr::V4(Ipv4Addr::UNSPECIFIED))),
            "127.0.0.1"
        );
        assert_eq!(
            address_or_loopback(Ok(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)))),
            "10.0.0.7"
        );
    }

    #[test]
    fn test_ip_never_empty() {
        assert!(!ip(&[]).unwrap().to_string().is_empty());
    }

    #[test]
    fn test_process_ids() {
        assert_eq!(pid(&[]).unwrap(), Value::from(std::process::id()));
        assert!(ppid(&[]).unwrap().as_int().is_some());
    }

    #[test]
    #[cfg(unix)]
    fn test_user_and_group_ids() {
        let expected = unsafe { (libc::getuid(), libc::getgid(), libc::geteuid(), libc::getegid()) };
        assert_eq!(uid(&[]).unwrap(), Value::Int(i64::from(expected.0)));
        assert_eq!(gid(&[]).unwrap(), Value::Int(i64::from(expected.1)));
        assert_eq!(euid(&[]).unwrap(), Value::Int(i64::from(expected.2)));
        assert_eq!(egid(&[]).unwrap(), Value::Int(i64::from(expected.3)));
        assert!(uid(&[Value::Nil]).is_err());
    }

    #[test]
    fn test_zero_argument_functions_reject_arguments() {
        assert!(user(&[Value::Nil]).is_err());
        assert!(cwd(&[Value::Nil]).is_err());
        assert!(env(&[]).is_err());
    }

    #[test]
    fn test_cwd_matches_process() {
        let expected = std::env::current_dir().unwrap();
        assert_eq!(
            cwd(&[]).unwrap().to_string(),
            expected.to_string_lossy().into_owned()
        );
    }
}
