//! Line-oriented console over the bot entry points.

use std::io::{self, BufRead, Write};
use warden_core::{Bot, DelegationOutcome, Signal, dice};
use warden_types::{ChannelId, PrincipalId, Role};

const HELP: &str = "\
commands:
  calc <expr>                 evaluate an expression
  roll [dN | end | start end] roll a die (default d100)
  grant <user> <role>         grant an independent role
  revoke <user> <role>        revoke an independent role
  perms [user]                list a user's roles
  setperms <user> <r1,r2|->   replace a user's role set (owner only)
  who <role>                  list holders of a role (owner only)
  counter set <chan> [start]  bind the counting channel (owner only)
  counter unset               disable the counting channel (owner only)
  counter status              show the counter cursor
  msg <chan> <text>           simulate a channel message
  help                        this text
  quit                        exit";

/// Interactive loop. Reads stdin line by line until EOF or `quit`.
pub async fn repl(bot: &Bot, acting: PrincipalId) -> anyhow::Result<()> {
    println!("warden console — acting as {acting} (type `help`)");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(()); // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            return Ok(());
        }
        run_line(bot, acting, line).await;
    }
}

/// Execute one console line against the bot.
pub async fn run_line(bot: &Bot, acting: PrincipalId, line: &str) {
    let (head, rest) = split_word(line);
    match head {
        "help" => println!("{HELP}"),
        "calc" => calc(bot, rest).await,
        "roll" => roll(rest),
        "grant" => delegate(bot, acting, rest, true).await,
        "revoke" => delegate(bot, acting, rest, false).await,
        "perms" => perms(bot, acting, rest).await,
        "setperms" => set_perms(bot, acting, rest).await,
        "who" => who(bot, acting, rest).await,
        "counter" => counter(bot, acting, rest).await,
        "msg" => msg(bot, rest).await,
        other => println!("unknown command `{other}` (type `help`)"),
    }
}

fn split_word(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    }
}

async fn calc(bot: &Bot, expr: &str) {
    match bot.compute(expr).await {
        Signal::EvalOk { value } => println!("{expr} = {}", value.display()),
        Signal::EvalFailed { error } => println!("{error}"),
        _ => {}
    }
}

fn roll(args: &str) {
    let parts: Vec<&str> = args.split_whitespace().collect();
    let result = match parts.as_slice() {
        [] => dice::roll_range(1, 100),
        [die] if die.starts_with('d') => die[1..]
            .parse::<i64>()
            .ok()
            .and_then(|sides| dice::roll_range(1, sides)),
        [end] => end.parse::<i64>().ok().and_then(|e| dice::roll_range(1, e)),
        [start, end] => match (start.parse::<i64>(), end.parse::<i64>()) {
            (Ok(s), Ok(e)) => dice::roll_range(s, e),
            _ => None,
        },
        _ => None,
    };
    match result {
        Some(value) => println!("rolled: {value}"),
        None => println!("bad dice range"),
    }
}

/// Gate an owner-only console command. Prints the denial and returns false
/// when `acting` lacks the required role.
async fn require(bot: &Bot, acting: PrincipalId, role: Role) -> bool {
    match bot.check_privileged(acting, role).await {
        Ok(()) => true,
        Err(Signal::PermissionDenied { reason }) => {
            println!("{reason}");
            false
        }
        Err(_) => false,
    }
}

async fn delegate(bot: &Bot, acting: PrincipalId, args: &str, grant: bool) {
    let parts: Vec<&str> = args.split_whitespace().collect();
    let [user, role] = parts.as_slice() else {
        println!("usage: {} <user> <role>", if grant { "grant" } else { "revoke" });
        return;
    };
    let Ok(target) = user.parse::<PrincipalId>() else {
        println!("bad user id `{user}`");
        return;
    };
    let Some(role) = Role::from_tag(role) else {
        println!("unknown role `{role}`");
        return;
    };

    match bot.delegate(acting, target, role, grant).await {
        Ok(DelegationOutcome::Rejected(reason)) => println!("{reason}"),
        Ok(DelegationOutcome::Added) => println!("role `{role}` granted to {target}"),
        Ok(DelegationOutcome::AlreadyHeld) => println!("{target} already holds `{role}`"),
        Ok(DelegationOutcome::Removed) => println!("role `{role}` revoked from {target}"),
        Ok(DelegationOutcome::NotRemoved) => {
            println!("could not revoke `{role}` (not held, or protected)")
        }
        Err(e) => println!("store write failed: {e}"),
    }
}

async fn perms(bot: &Bot, acting: PrincipalId, args: &str) {
    let target = if args.is_empty() {
        acting
    } else {
        match args.parse::<PrincipalId>() {
            Ok(id) => id,
            Err(_) => {
                println!("bad user id `{args}`");
                return;
            }
        }
    };

    let roles = bot.perms().roles_of(target).await;
    if roles.is_empty() {
        println!("{target} has no assigned roles");
        return;
    }
    for role in roles {
        println!("  {role} — {}", role.description());
    }
}

async fn set_perms(bot: &Bot, acting: PrincipalId, args: &str) {
    if !require(bot, acting, Role::Owner).await {
        return;
    }
    let parts: Vec<&str> = args.split_whitespace().collect();
    let [user, tags] = parts.as_slice() else {
        println!("usage: setperms <user> <role,role,...|->");
        return;
    };
    let Ok(target) = user.parse::<PrincipalId>() else {
        println!("bad user id `{user}`");
        return;
    };

    let mut roles = warden_types::RoleSet::new();
    if *tags != "-" {
        for tag in tags.split(',') {
            let Some(role) = Role::from_tag(tag) else {
                println!("unknown role `{tag}`");
                return;
            };
            roles.insert(role);
        }
    }

    match bot.perms().set_roles(target, roles).await {
        Ok(()) => println!("roles updated for {target}"),
        Err(e) => println!("store write failed: {e}"),
    }
}

async fn who(bot: &Bot, acting: PrincipalId, args: &str) {
    if !require(bot, acting, Role::Owner).await {
        return;
    }
    let Some(role) = Role::from_tag(args) else {
        println!("unknown role `{args}`");
        return;
    };
    let holders = bot.perms().principals_with(role).await;
    if holders.is_empty() {
        println!("nobody holds `{role}`");
        return;
    }
    for id in holders {
        println!("  {id}");
    }
}

async fn counter(bot: &Bot, acting: PrincipalId, args: &str) {
    let (sub, rest) = split_word(args);
    match sub {
        "status" => {
            let cursor = bot.counter().status().await;
            match cursor.channel {
                Some(channel) => println!(
                    "counting in channel {channel}, next expected {}",
                    cursor.next_expected
                ),
                None => println!("counter disabled"),
            }
            return;
        }
        "set" | "unset" => {}
        other => {
            println!("unknown counter subcommand `{other}`");
            return;
        }
    }

    // set/unset mutate state: owner only
    if !require(bot, acting, Role::Owner).await {
        return;
    }

    if sub == "unset" {
        match bot.counter().disable().await {
            Ok(()) => println!("counter disabled"),
            Err(e) => println!("store write failed: {e}"),
        }
        return;
    }

    let parts: Vec<&str> = rest.split_whitespace().collect();
    let (channel, start) = match parts.as_slice() {
        [channel] => (channel.parse::<ChannelId>(), Ok(warden_config::DEFAULT_COUNTER_SEED)),
        [channel, start] => (channel.parse::<ChannelId>(), start.parse::<i64>()),
        _ => {
            println!("usage: counter set <channel> [start]");
            return;
        }
    };
    let (Ok(channel), Ok(start)) = (channel, start) else {
        println!("bad channel or start value");
        return;
    };

    match bot.counter().configure(channel, start).await {
        Ok(()) => println!("counting in channel {channel}, starting at {start}"),
        Err(e) => println!("store write failed: {e}"),
    }
}

async fn msg(bot: &Bot, args: &str) {
    let (channel, text) = split_word(args);
    let Ok(channel) = channel.parse::<ChannelId>() else {
        println!("usage: msg <channel> <text>");
        return;
    };

    match bot.observe_message(channel, false, text).await {
        Ok(Some(Signal::CounterSuccess)) => println!("✅"),
        Ok(Some(Signal::CounterMismatch { expected_previous })) => {
            println!("⚠️  expected previous number: {expected_previous}")
        }
        Ok(_) => println!("(no reaction)"),
        Err(e) => println!("store write failed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_word_separates_head_and_rest() {
        assert_eq!(split_word("calc 1 + 2"), ("calc", "1 + 2"));
        assert_eq!(split_word("help"), ("help", ""));
        assert_eq!(split_word("counter   set 7"), ("counter", "set 7"));
    }
}
