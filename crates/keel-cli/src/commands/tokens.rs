use std::path::PathBuf;

use keel_lib::editor::semantic_tokens;
use keel_lib::parse_module;

use super::{module_name, read_source};
use crate::cli::TokensParams;

pub struct TokensArgs {
    pub source_path: PathBuf,
    pub module: Option<String>,
}

impl From<TokensParams> for TokensArgs {
    fn from(params: TokensParams) -> Self {
        TokensArgs {
            source_path: params.source_path,
            module: params.module,
        }
    }
}

pub fn run(args: TokensArgs) {
    let source = read_source(&args.source_path);
    let name = module_name(&args.source_path, args.module.as_deref());
    let module = parse_module(&name, &source);

    for token in semantic_tokens(&module) {
        match serde_json::to_string(&token) {
            Ok(line) => println!("{line}"),
            Err(error) => {
                eprintln!("error: {error}");
                std::process::exit(1);
            }
        }
    }
}
