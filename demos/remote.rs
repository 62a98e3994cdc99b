use std::time::Duration;

use argot::{Before, Command, Config, Run, RunError};

#[derive(Debug, Default, Config)]
#[cli(before)]
struct Remote {
    #[cli("short=v,help=print each step")]
    verbose: bool,
}

impl Before for Remote {
    fn before(&mut self) -> Result<(), RunError> {
        if self.verbose {
            eprintln!("verbose output enabled");
        }

        Ok(())
    }
}

#[derive(Debug, Default, Config)]
#[cli(run)]
struct Fetch {
    #[cli("short=d,env=REMOTE_DEPTH,placeholder=N,help=limit fetching to the given number of commits")]
    depth: Option<u32>,
    #[cli("short=t,help=give up after this long")]
    timeout: Duration,
    #[cli("args,placeholder=REMOTE,help=the remotes to fetch from")]
    remotes: Vec<String>,
}

impl Run for Fetch {
    fn run(&mut self) -> Result<(), RunError> {
        if self.remotes.is_empty() {
            return Err(RunError::message("no remote given").usage());
        }

        for remote in &self.remotes {
            println!(
                "fetching {remote} (depth: {:?}, timeout: {:?})",
                self.depth, self.timeout
            );
        }

        Ok(())
    }
}

fn main() {
    let mut remote = Remote::default();
    let mut fetch = Fetch {
        timeout: Duration::from_secs(30),
        ..Fetch::default()
    };

    Command::new("remote", &mut remote)
        .about("Manage remote repositories.")
        .subcommand(
            Command::new("fetch", &mut fetch)
                .alias("f")
                .about("Download objects from remotes."),
        )
        .build()
        .parse()
        .run_or_exit();
}
