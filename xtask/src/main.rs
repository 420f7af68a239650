//! Developer workflow commands for the playground workspace (`cargo xtask`).
//!
//! Wraps the wasm toolchain setup and the trunk build/serve workflow so the repository exposes
//! stable entrypoints through Cargo aliases.

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode, Stdio};

use chrono::Local;

const SITE_CARGO_FEATURE: &str = "csr";

fn main() -> ExitCode {
    let root = workspace_root();
    let mut args = env::args().skip(1);

    let Some(cmd) = args.next() else {
        print_usage();
        return ExitCode::from(2);
    };

    let rest: Vec<String> = args.collect();

    let result = match cmd.as_str() {
        "setup-web" => setup_web(&root),
        "dev" => dev_command(&root, rest),
        "build-web" => build_web(&root, rest),
        "check-web" => check_web(&root),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => Err(format!("unknown xtask command: {other}")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn print_usage() {
    eprintln!(
        "Usage: cargo xtask <command> [args]\n\
         \n\
         Commands:\n\
           setup-web           Install wasm target and trunk (if missing)\n\
           dev [trunk args]    Start trunk dev server in foreground (defaults to --open)\n\
           build-web [args]    Build static web bundle with trunk\n\
           check-web           Run site compile checks (CSR native + wasm)\n"
    );
}

fn setup_web(root: &Path) -> Result<(), String> {
    run(
        root,
        "rustup",
        vec!["target", "add", "wasm32-unknown-unknown"],
    )?;

    if command_available("trunk") {
        println!("trunk already installed");
        return Ok(());
    }

    run(root, "cargo", vec!["install", "trunk"])
}

fn dev_command(root: &Path, args: Vec<String>) -> Result<(), String> {
    ensure_command(
        "trunk",
        "Install it with `cargo setup-web` (or `cargo install trunk`)",
    )?;

    let mut trunk_args = vec!["serve".to_string()];
    if !args.iter().any(|arg| arg == "--no-open" || arg == "--open") {
        trunk_args.push("--open".to_string());
    }
    trunk_args.extend(args.into_iter().filter(|arg| arg != "--no-open"));

    run_trunk(site_dir(root), trunk_args)
}

fn build_web(root: &Path, args: Vec<String>) -> Result<(), String> {
    ensure_command(
        "trunk",
        "Install it with `cargo setup-web` (or `cargo install trunk`)",
    )?;

    let mut trunk_args = vec![
        "build".to_string(),
        "index.html".to_string(),
        "--release".to_string(),
    ];
    if !args_specify_dist(&args) {
        trunk_args.push("--dist".to_string());
        trunk_args.push("target/trunk-dist".to_string());
    }
    trunk_args.extend(args);

    run_trunk(site_dir(root), trunk_args)
}

fn check_web(root: &Path) -> Result<(), String> {
    run(
        root,
        "cargo",
        vec!["check", "-p", "site", "--features", SITE_CARGO_FEATURE],
    )?;

    if wasm_target_installed() {
        run(
            root,
            "cargo",
            vec![
                "check",
                "-p",
                "site",
                "--target",
                "wasm32-unknown-unknown",
                "--features",
                SITE_CARGO_FEATURE,
            ],
        )?;
    } else {
        eprintln!(
            "warn: wasm32-unknown-unknown target not installed; skipping wasm check (run `cargo setup-web`)"
        );
    }

    Ok(())
}

fn args_specify_dist(args: &[String]) -> bool {
    args.iter()
        .any(|arg| arg == "--dist" || arg.starts_with("--dist="))
}

fn site_dir(root: &Path) -> PathBuf {
    root.join("crates/site")
}

fn run_trunk(dir: PathBuf, args: Vec<String>) -> Result<(), String> {
    run_owned(&dir, "trunk", args)
}

fn run(root: &Path, program: &str, args: Vec<&str>) -> Result<(), String> {
    run_owned(
        root,
        program,
        args.into_iter().map(str::to_string).collect(),
    )
}

fn run_owned(root: &Path, program: &str, args: Vec<String>) -> Result<(), String> {
    println!(
        "[{}] + {} {}",
        Local::now().format("%H:%M:%S"),
        program,
        args.join(" ")
    );

    let status = Command::new(program)
        .args(&args)
        .current_dir(root)
        .status()
        .map_err(|err| format!("failed to launch `{program}`: {err}"))?;

    if status.success() {
        Ok(())
    } else {
        Err(format!("`{program}` exited with {status}"))
    }
}

fn command_available(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn ensure_command(program: &str, hint: &str) -> Result<(), String> {
    if command_available(program) {
        Ok(())
    } else {
        Err(format!("required command `{program}` not found. {hint}"))
    }
}

fn wasm_target_installed() -> bool {
    Command::new("rustup")
        .args(["target", "list", "--installed"])
        .stderr(Stdio::null())
        .output()
        .map(|output| {
            String::from_utf8_lossy(&output.stdout)
                .lines()
                .any(|line| line.trim() == "wasm32-unknown-unknown")
        })
        .unwrap_or(false)
}
