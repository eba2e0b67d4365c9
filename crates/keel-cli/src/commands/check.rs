use std::path::PathBuf;

use keel_lib::{parse_module, Registry};

use super::{module_name, read_source};
use crate::cli::CheckParams;

pub struct CheckArgs {
    pub source_path: PathBuf,
    pub module: Option<String>,
    pub signatures: Option<PathBuf>,
    pub color: bool,
}

impl From<CheckParams> for CheckArgs {
    fn from(params: CheckParams) -> Self {
        CheckArgs {
            source_path: params.source_path,
            module: params.module,
            signatures: params.signatures,
            color: params.color,
        }
    }
}

pub fn run(args: CheckArgs) {
    let source = read_source(&args.source_path);
    let name = module_name(&args.source_path, args.module.as_deref());

    let mut registry = Registry::new();
    if let Some(signatures_path) = &args.signatures {
        let json = read_source(signatures_path);
        if let Err(error) = registry.load_signatures(&json) {
            eprintln!("error: {error}");
            std::process::exit(1);
        }
    }

    let module = parse_module(&name, &source);
    let diagnostics = module.validate(&registry);

    if !diagnostics.is_empty() {
        let path = args.source_path.display().to_string();
        eprint!(
            "{}",
            diagnostics
                .printer()
                .source(&source)
                .path(&path)
                .colored(args.color)
                .render()
        );
        if diagnostics.has_errors() {
            std::process::exit(1);
        }
    }

    // Silent on success (like cargo check).
}
