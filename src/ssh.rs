//! Checks that an ssh agent with loaded keys is available.
//!
//! Cloning over ssh prompts for passphrases once per repository when no agent
//! holds the keys, which stalls a long run. These checks run once, before any
//! repository is touched.

use std::time::Duration;

use log::debug;

use crate::error::{Error, Result};
use crate::runner::probe_output;

pub const NO_AGENT: &str = "start an ssh-agent using: eval $(ssh-agent)";
pub const NO_KEYS: &str = "add keys to your ssh-agent using: ssh-add";

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Fails unless an `ssh-agent` process is running and holds at least one key.
pub fn check_agent() -> Result<()> {
    let (_, processes) = probe_output("ps", &["-ef"], PROBE_TIMEOUT)?;
    agent_running(&processes)?;
    let (ok, identities) = probe_output("ssh-add", &["-l"], PROBE_TIMEOUT)?;
    debug!("ssh-add -l: {}", identities.trim());
    keys_loaded(ok, &identities)
}

fn agent_running(process_list: &str) -> Result<()> {
    if process_list.contains("ssh-agent") {
        Ok(())
    } else {
        Err(Error::CredentialAgent {
            message: NO_AGENT.to_string(),
        })
    }
}

fn keys_loaded(ok: bool, identities: &str) -> Result<()> {
    if identities.contains("The agent has no identities.") {
        return Err(Error::CredentialAgent {
            message: NO_KEYS.to_string(),
        });
    }
    if !ok {
        return Err(Error::CredentialAgent {
            message: format!("ssh-add -l failed: {}", identities.trim()),
        });
    }
    Ok(())
}
