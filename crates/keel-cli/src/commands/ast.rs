use std::path::PathBuf;

use keel_lib::ast::format_module;
use keel_lib::parse_module;

use super::{module_name, read_source};
use crate::cli::AstParams;

pub struct AstArgs {
    pub source_path: PathBuf,
    pub module: Option<String>,
}

impl From<AstParams> for AstArgs {
    fn from(params: AstParams) -> Self {
        AstArgs {
            source_path: params.source_path,
            module: params.module,
        }
    }
}

pub fn run(args: AstArgs) {
    let source = read_source(&args.source_path);
    let name = module_name(&args.source_path, args.module.as_deref());
    let module = parse_module(&name, &source);
    print!("{}", format_module(&module));

    let errors = module.syntax_errors();
    if !errors.is_empty() {
        eprintln!("{} syntax error(s)", errors.len());
        std::process::exit(1);
    }
}
