//! mcdoc CLI
//!
//! Loads a directory of `.mcdoc` files, runs the type instantiation engine
//! over it, and reports diagnostics or dumps an instantiated type.

use std::path::Path;

use mcdoc_ir::CanonicalPath;
use mcdoc_types::Engine;

fn main() {
    mcdocc::tracing_setup::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let code = match args[1].as_str() {
        "check" => {
            let Some(dir) = args.get(2) else {
                eprintln!("Usage: mcdocc check <dir>");
                std::process::exit(1);
            };
            check(Path::new(dir))
        }
        "dump" => {
            let (Some(dir), Some(path)) = (args.get(2), args.get(3)) else {
                eprintln!("Usage: mcdocc dump <dir> <path>");
                std::process::exit(1);
            };
            dump(Path::new(dir), path)
        }
        "help" | "--help" | "-h" => {
            print_usage();
            0
        }
        "version" | "--version" | "-v" => {
            println!("mcdocc {}", env!("CARGO_PKG_VERSION"));
            0
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            1
        }
    };
    std::process::exit(code);
}

fn print_usage() {
    println!("mcdoc type engine CLI");
    println!();
    println!("Usage: mcdocc <command> [options]");
    println!();
    println!("Commands:");
    println!("  check <dir>         Load every .mcdoc file under <dir> and report diagnostics");
    println!("  dump <dir> <path>   Instantiate a canonical path (e.g. ::foo::Bar) and print its shape");
    println!("  help                Show this help message");
    println!("  version             Show version information");
}

fn load_project_or_exit(dir: &Path) -> mcdoc_loader::LoadedProject {
    match mcdocc::load_dir(dir) {
        Ok(project) => project,
        Err(e) => {
            eprintln!("Error reading '{}': {e}", dir.display());
            std::process::exit(1);
        }
    }
}

fn check(dir: &Path) -> i32 {
    let project = load_project_or_exit(dir);
    let has_errors = project.diagnostics.has_errors();
    let count = project.diagnostics.as_slice().len();
    let engine = Engine::new(project);
    mcdocc::report::print_diagnostics(&engine.diagnostics());

    if has_errors {
        println!("FAILED ({count} diagnostics)");
        1
    } else {
        println!("OK ({count} diagnostics)");
        0
    }
}

fn dump(dir: &Path, path_str: &str) -> i32 {
    let project = load_project_or_exit(dir);
    let engine = Engine::new(project);

    let path = parse_canonical_path(&engine, path_str);
    let instantiated = engine.instantiate_path(&path);
    println!("{}", mcdocc::render::render(&instantiated, &engine));

    let diagnostics = engine.diagnostics();
    mcdocc::report::print_diagnostics(&diagnostics);
    mcdocc::report::exit_code(&diagnostics)
}

fn parse_canonical_path(engine: &Engine, path_str: &str) -> CanonicalPath {
    path_str
        .trim_start_matches("::")
        .split("::")
        .filter(|s| !s.is_empty())
        .fold(CanonicalPath::root(), |p, seg| p.joined(engine.interner().intern(seg)))
}
