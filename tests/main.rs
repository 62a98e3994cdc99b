use std::cell::RefCell;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use argot::{
    BindError, BuildError, Cancellation, Command, Config, Error, MapEnvironment, MemoryInterface,
    ParseError, Run, RunCancellable, RunError, UsageError,
};
use assert_matches::assert_matches;
use rstest::rstest;

fn parse<C: Config>(config: &mut C, environment: MapEnvironment, tokens: &[&str]) -> Option<Error> {
    Command::new("test", config)
        .environment(environment)
        .interface(MemoryInterface::default())
        .build_command()
        .unwrap()
        .parse_tokens(tokens)
        .into_error()
}

#[derive(Debug, Default, Config)]
struct Example {
    #[cli("name=bool")]
    flag: bool,
    #[cli("required,short=n")]
    name: String,
}

#[test]
fn example_record() {
    // Setup
    let mut example = Example::default();
    let mut missing = Example::default();

    // Execute
    let error = parse(
        &mut example,
        MapEnvironment::new(),
        &["--bool", "-n", "alice"],
    );
    let missing_error = parse(&mut missing, MapEnvironment::new(), &["--bool"]);

    // Verify
    assert_matches!(error, None);
    assert!(example.flag);
    assert_eq!(example.name, "alice");
    assert_matches!(
        missing_error,
        Some(Error::Usage(UsageError::RequiredFieldMissing(name))) if name == "name"
    );
}

#[derive(Debug, Config)]
struct Primitives {
    signed: i64,
    unsigned: u8,
    float: f64,
    letter: char,
    text: String,
    switch: bool,
    timeout: Duration,
    path: PathBuf,
    address: Ipv4Addr,
}

#[test]
fn defaults_round_trip() {
    // Setup
    let mut initial = Primitives {
        signed: -42,
        unsigned: 200,
        float: 2.5,
        letter: 'q',
        text: "hello".to_string(),
        switch: true,
        timeout: Duration::from_millis(90_500),
        path: PathBuf::from("/var/tmp"),
        address: Ipv4Addr::new(10, 0, 0, 1),
    };
    let tokens: Vec<String> = {
        let command = Command::new("test", &mut initial).build_command().unwrap();
        let tokens = command
            .info(command.root())
            .fields
            .iter()
            .filter(|field| field.name != "help")
            .map(|field| format!("--{}={}", field.name, field.default))
            .collect();
        tokens
    };
    let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();
    let mut parsed = Primitives {
        signed: 0,
        unsigned: 0,
        float: 0.0,
        letter: ' ',
        text: String::default(),
        switch: false,
        timeout: Duration::ZERO,
        path: PathBuf::default(),
        address: Ipv4Addr::UNSPECIFIED,
    };

    // Execute
    let error = parse(&mut parsed, MapEnvironment::new(), &tokens);

    // Verify
    assert_matches!(error, None);
    assert_eq!(parsed.signed, initial.signed);
    assert_eq!(parsed.unsigned, initial.unsigned);
    assert_eq!(parsed.float, initial.float);
    assert_eq!(parsed.letter, initial.letter);
    assert_eq!(parsed.text, initial.text);
    assert_eq!(parsed.switch, initial.switch);
    assert_eq!(parsed.timeout, initial.timeout);
    assert_eq!(parsed.path, initial.path);
    assert_eq!(parsed.address, initial.address);
}

#[derive(Debug, Default, Config)]
struct Accumulate {
    #[cli("append,short=v")]
    values: Vec<u32>,
    #[cli("append,short=b")]
    boxed: Vec<Box<u32>>,
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(5)]
fn accumulate_in_order(#[case] count: u32) {
    // Setup
    let mut accumulate = Accumulate::default();
    let values: Vec<String> = (0..count).map(|i| (i * 7).to_string()).collect();
    let mut tokens = Vec::default();

    for value in &values {
        tokens.extend(["-v", value.as_str(), "--boxed", value.as_str()]);
    }

    // Execute
    let error = parse(&mut accumulate, MapEnvironment::new(), &tokens);

    // Verify
    assert_matches!(error, None);
    let expected: Vec<u32> = (0..count).map(|i| i * 7).collect();
    assert_eq!(accumulate.values, expected);
    let boxed: Vec<u32> = accumulate.boxed.iter().map(|value| **value).collect();
    assert_eq!(boxed, expected);
}

#[derive(Debug, Default, Config)]
struct Optional {
    #[cli("short=p")]
    port: Option<u16>,
    plain: u16,
}

#[test]
fn optional_untouched_until_set() {
    // Setup
    let mut unset = Optional::default();
    let mut set = Optional::default();

    // Execute
    let unset_error = parse(&mut unset, MapEnvironment::new(), no_tokens());
    let set_error = parse(&mut set, MapEnvironment::new(), &["-p", "8080", "--plain", "8080"]);

    // Verify
    assert_matches!(unset_error, None);
    assert_eq!(unset.port, None);
    assert_matches!(set_error, None);
    assert_eq!(set.port, Some(set.plain));
}

#[derive(Debug, Default, PartialEq, Config)]
struct Cluster {
    #[cli("short=a")]
    all: bool,
    #[cli("short=b")]
    brief: bool,
    #[cli("short=c")]
    count: u8,
}

#[rstest]
#[case(&["-abc", "3"])]
#[case(&["-a", "-b", "-c", "3"])]
#[case(&["-abc=3"])]
#[case(&["--all", "--brief=true", "--count", "3"])]
fn cluster_equivalence(#[case] tokens: &[&str]) {
    let mut cluster = Cluster::default();
    assert_matches!(parse(&mut cluster, MapEnvironment::new(), tokens), None);
    assert_eq!(
        cluster,
        Cluster {
            all: true,
            brief: true,
            count: 3,
        }
    );
}

#[test]
fn cluster_value_not_last() {
    let mut cluster = Cluster::default();
    let error = parse(&mut cluster, MapEnvironment::new(), &["-cab", "3"]);
    assert_matches!(
        error,
        Some(Error::Usage(UsageError::Parse(ParseError::MissingArgument(name)))) if name == "c"
    );
}

#[derive(Debug, Default, Config)]
struct Required {
    #[cli("required,env=FIRST")]
    first: String,
    #[cli("required")]
    second: String,
}

#[rstest]
#[case(MapEnvironment::new(), "first")]
#[case(MapEnvironment::from([("FIRST", "x")]), "second")]
fn required_first_missing(#[case] environment: MapEnvironment, #[case] expected: &str) {
    let mut required = Required::default();
    let error = parse(&mut required, environment, no_tokens());
    assert_matches!(
        error,
        Some(Error::Usage(UsageError::RequiredFieldMissing(name))) if name == expected
    );
}

#[derive(Debug, Default, Config)]
struct Environmental {
    #[cli("env=COUNT")]
    count: u32,
    #[cli("append,env=TAGS")]
    tags: Vec<String>,
}

#[rstest]
#[case(&[], 9, vec!["env"])]
#[case(&["--count", "0"], 0, vec!["env"])]
#[case(&["--tags", "arg"], 9, vec!["arg"])]
fn environment_fallback(
    #[case] tokens: &[&str],
    #[case] count: u32,
    #[case] tags: Vec<&str>,
) {
    // Setup
    let mut environmental = Environmental::default();
    let environment = MapEnvironment::from([("COUNT", "9"), ("TAGS", "env")]);

    // Execute
    let error = parse(&mut environmental, environment, tokens);

    // Verify
    assert_matches!(error, None);
    assert_eq!(environmental.count, count);
    assert_eq!(environmental.tags, tags);
}

#[derive(Debug, Default, Config)]
struct Positional {
    #[cli("short=f")]
    flag: bool,
    #[cli("args")]
    rest: Vec<String>,
}

#[test]
fn double_dash_stops_flags() {
    // Setup
    let mut positional = Positional::default();

    // Execute
    let error = parse(
        &mut positional,
        MapEnvironment::new(),
        &["--flag", "--", "--not-a-flag", "-f"],
    );

    // Verify
    assert_matches!(error, None);
    assert!(positional.flag);
    assert_eq!(positional.rest, vec!["--not-a-flag", "-f"]);
}

#[test]
fn positional_keeps_initial_without_residual() {
    let mut positional = Positional {
        flag: false,
        rest: vec!["default".to_string()],
    };
    assert_matches!(parse(&mut positional, MapEnvironment::new(), &["-f"]), None);
    assert_eq!(positional.rest, vec!["default"]);
}

#[derive(Debug, Default, Config)]
struct UnknownTag {
    #[cli("short=u,foo=bar,help=fine")]
    value: u8,
}

#[test]
fn unknown_tag_named() {
    let mut unknown = UnknownTag::default();
    let error = Command::new("test", &mut unknown)
        .build_command()
        .unwrap_err();
    assert_eq!(
        error,
        BuildError::Bind {
            command: "test".to_string(),
            source: BindError::UnknownTags {
                field: "value".to_string(),
                keys: vec!["foo".to_string()],
            },
        }
    );
}

#[derive(Debug, Default, Config)]
struct UnknownSkippedTag {
    #[cli("-,foo=bar")]
    cache: Rc<RefCell<Vec<u8>>>,
}

#[test]
fn unknown_tag_named_on_skipped_field() {
    let mut unknown = UnknownSkippedTag::default();
    let error = Command::new("test", &mut unknown)
        .build_command()
        .unwrap_err();
    assert_eq!(
        error,
        BuildError::Bind {
            command: "test".to_string(),
            source: BindError::UnknownTags {
                field: "cache".to_string(),
                keys: vec!["foo".to_string()],
            },
        }
    );
}

#[derive(Debug, Default, Config)]
struct Skipped {
    #[cli("-")]
    cache: Rc<RefCell<Vec<u8>>>,
    #[cli("short=c")]
    count: u8,
}

#[test]
fn skipped_field_untouched() {
    // Setup
    let mut skipped = Skipped::default();
    skipped.cache.borrow_mut().push(1);

    // Execute
    let error = parse(&mut skipped, MapEnvironment::new(), &["-c", "2"]);

    // Verify
    assert_matches!(error, None);
    assert_eq!(skipped.count, 2);
    assert_eq!(*skipped.cache.borrow(), vec![1]);
}

#[derive(Debug, Default, Config)]
struct Keywords {
    #[cli("short=t")]
    r#type: String,
    r#match: bool,
}

#[test]
fn raw_identifier_fields() {
    // Setup
    let mut keywords = Keywords::default();

    // Execute
    let error = parse(
        &mut keywords,
        MapEnvironment::new(),
        &["--type", "tree", "--match"],
    );

    // Verify
    assert_matches!(error, None);
    assert_eq!(keywords.r#type, "tree");
    assert!(keywords.r#match);
}

#[derive(Debug, Default, Config)]
struct Inner {
    #[cli("short=l")]
    level: String,
    quiet: bool,
}

#[derive(Debug, Default, Config)]
struct Outer {
    before: u8,
    #[cli("embed")]
    inner: Inner,
    after: u8,
}

#[derive(Debug, Default, Config)]
struct Colliding {
    level: u8,
    #[cli("embed")]
    inner: Inner,
}

#[test]
fn embedded_depth_first() {
    // Setup
    let mut outer = Outer::default();

    // Execute
    let names: Vec<String> = {
        let command = Command::new("test", &mut outer).build_command().unwrap();
        let names = command
            .info(command.root())
            .fields
            .iter()
            .map(|field| field.name.clone())
            .collect();
        names
    };
    let error = parse(
        &mut outer,
        MapEnvironment::new(),
        &["-l", "debug", "--quiet", "--after", "2"],
    );

    // Verify
    assert_eq!(names, vec!["help", "before", "level", "quiet", "after"]);
    assert_matches!(error, None);
    assert_eq!(outer.inner.level, "debug");
    assert!(outer.inner.quiet);
    assert_eq!(outer.after, 2);
}

#[test]
fn embedded_collision() {
    let mut colliding = Colliding::default();
    let error = Command::new("test", &mut colliding)
        .build_command()
        .unwrap_err();
    assert_matches!(
        error,
        BuildError::Bind {
            source: BindError::DuplicateName { field, name },
            ..
        } if field == "inner.level" && name == "level"
    );
}

type Log = Rc<RefCell<Vec<String>>>;

#[derive(Debug, Default, Config)]
#[cli(before)]
struct Git {
    #[cli("short=C,placeholder=DIR,help=run as if started in DIR")]
    directory: Option<PathBuf>,
    #[cli("-")]
    log: Log,
}

impl argot::Before for Git {
    fn before(&mut self) -> Result<(), RunError> {
        self.log
            .borrow_mut()
            .push(format!("git {:?}", self.directory));
        Ok(())
    }
}

#[derive(Debug, Default, Config)]
#[cli(run)]
struct CloneRepository {
    #[cli("short=d,env=CLONE_DEPTH")]
    depth: Option<u32>,
    #[cli("args")]
    repositories: Vec<String>,
    #[cli("-")]
    log: Log,
}

impl Run for CloneRepository {
    fn run(&mut self) -> Result<(), RunError> {
        if self.repositories.is_empty() {
            return Err(RunError::message("nothing to clone").with_exit_code(2));
        }

        self.log
            .borrow_mut()
            .push(format!("clone {:?} {:?}", self.depth, self.repositories));
        Ok(())
    }
}

#[derive(Debug, Default, Config)]
#[cli(run_cancellable)]
struct Watch {
    #[cli("-")]
    log: Log,
}

impl RunCancellable for Watch {
    fn run(&mut self, cancellation: &Cancellation) -> Result<(), RunError> {
        self.log
            .borrow_mut()
            .push(format!("watch {}", cancellation.is_cancelled()));
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Tree {
    git: Git,
    clone: CloneRepository,
    watch: Watch,
    log: Log,
}

impl Tree {
    fn new() -> Self {
        let log = Log::default();
        Self {
            git: Git {
                log: log.clone(),
                ..Git::default()
            },
            clone: CloneRepository {
                log: log.clone(),
                ..CloneRepository::default()
            },
            watch: Watch { log: log.clone() },
            log,
        }
    }

    fn run(&mut self, tokens: &[&str], interface: MemoryInterface, cancellation: &Cancellation) -> i32 {
        Command::new("git", &mut self.git)
            .environment(MapEnvironment::from([("CLONE_DEPTH", "1")]))
            .interface(interface)
            .subcommand(Command::new("clone", &mut self.clone).about("copy a repository"))
            .subcommand(Command::new("watch", &mut self.watch).alias("w"))
            .build_command()
            .unwrap()
            .parse_tokens(tokens)
            .run_to_exit_code(cancellation)
    }

    fn log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

#[test]
fn subcommand_runs() {
    // Setup
    let mut tree = Tree::new();
    let interface = MemoryInterface::default();

    // Execute
    let code = tree.run(
        &["-C", "/src", "clone", "origin"],
        interface.clone(),
        &Cancellation::new(),
    );

    // Verify
    assert_eq!(code, 0);
    assert!(interface.errors().is_empty());
    assert_eq!(
        tree.log(),
        vec![
            "git Some(\"/src\")",
            "clone Some(1) [\"origin\"]",
        ]
    );
}

#[rstest]
#[case(false)]
#[case(true)]
fn subcommand_cancellable(#[case] cancelled: bool) {
    // Setup
    let mut tree = Tree::new();
    let cancellation = Cancellation::new();

    if cancelled {
        cancellation.cancel();
    }

    // Execute
    let code = tree.run(&["w"], MemoryInterface::default(), &cancellation);

    // Verify
    assert_eq!(code, 0);
    assert_eq!(tree.log(), vec!["git None".to_string(), format!("watch {cancelled}")]);
}

#[test]
fn subcommand_run_error() {
    // Setup
    let mut tree = Tree::new();
    let interface = MemoryInterface::default();

    // Execute
    let code = tree.run(&["clone"], interface.clone(), &Cancellation::new());

    // Verify
    assert_eq!(code, 2);
    assert_eq!(interface.errors(), vec!["error: nothing to clone"]);
}

#[test]
fn subcommand_help() {
    // Setup
    let mut tree = Tree::new();
    let interface = MemoryInterface::default();

    // Execute
    let code = tree.run(&["--help"], interface.clone(), &Cancellation::new());

    // Verify
    assert_eq!(code, 0);
    assert!(interface.errors().is_empty());
    assert!(tree.log().is_empty());
    let messages = interface.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("-C, --directory <DIR>"));
    assert!(messages[0].contains("clone     copy a repository"));
    assert!(messages[0].contains("watch, w"));
}

#[test]
fn subcommand_missing() {
    // Setup
    let mut tree = Tree::new();
    let interface = MemoryInterface::default();

    // Execute
    let code = tree.run(no_tokens(), interface.clone(), &Cancellation::new());

    // Verify
    assert_eq!(code, 1);
    let errors = interface.errors();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].starts_with("USAGE:\n    git [OPTIONS] <COMMAND>"));
    assert_eq!(errors[1], "error: no command specified.");
}

fn no_tokens() -> &'static [&'static str] {
    &[]
}
