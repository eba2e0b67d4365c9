//! Validation contexts.
//!
//! [`ModuleContext`] is the pass-1 symbol table: everything the module
//! declares, keyed by name per category, plus the registry for cross-module
//! lookups. [`BlockContext`] layers local scopes on top of it while bodies
//! are checked in pass 2.

use indexmap::IndexMap;

use crate::ast::TypeRefNode;
use crate::diagnostics::Diagnostics;
use crate::parsing::Span;
use crate::types::{FunctionType, Module, Registry, Type, WithDefinition};

/// Cycle/nesting bound for lazy type-reference resolution. Alias chains and
/// mutually recursive type declarations terminate here.
const MAX_REALIZE_DEPTH: u32 = 16;

pub struct ModuleContext<'a> {
    pub module_name: &'a str,
    pub registry: &'a Registry,
    pub constants: IndexMap<String, WithDefinition<Type>>,
    pub functions: IndexMap<String, WithDefinition<FunctionType>>,
    pub types: IndexMap<String, Type>,
    /// Methods from `impl` blocks, keyed by target type name.
    pub methods: IndexMap<String, IndexMap<String, FunctionType>>,
}

impl<'a> ModuleContext<'a> {
    pub fn new(module_name: &'a str, registry: &'a Registry) -> Self {
        ModuleContext {
            module_name,
            registry,
            constants: IndexMap::new(),
            functions: IndexMap::new(),
            types: IndexMap::new(),
            methods: IndexMap::new(),
        }
    }

    pub fn find_module(&self, name: &str) -> Option<&Module> {
        self.registry.find_module(name)
    }

    /// Resolve lazy references until a structural type remains, stopping at
    /// nominal referenced-module types. References that do not resolve
    /// degrade to [`Type::Unknown`]: the resolution failure is reported once
    /// at the declaration site, and `Unknown` keeps it from cascading into
    /// mismatch noise everywhere the name is used.
    pub fn realize(&self, ty: &Type) -> Type {
        self.realize_depth(ty, 0)
    }

    fn realize_depth(&self, ty: &Type, depth: u32) -> Type {
        if depth >= MAX_REALIZE_DEPTH {
            return Type::Unknown;
        }
        match ty {
            Type::Reference {
                module: None, name, ..
            } => match self.types.get(name) {
                Some(resolved) => self.realize_depth(&resolved.clone(), depth + 1),
                None => Type::Unknown,
            },
            Type::Reference {
                module: Some(module),
                name,
                ..
            } => {
                if module == self.module_name {
                    return self.realize_depth(
                        &Type::Reference {
                            module: None,
                            name: name.clone(),
                            type_args: Vec::new(),
                        },
                        depth + 1,
                    );
                }
                match self.find_module(module).and_then(|m| m.find_type(name)) {
                    // Referenced-module types stay nominal: resolving
                    // `m::T` to itself would loop, so stop there.
                    Some(Type::Reference {
                        module: resolved_module,
                        name: resolved_name,
                        type_args,
                    }) if resolved_module.as_deref() == Some(module.as_str())
                        && resolved_name == *name =>
                    {
                        Type::Reference {
                            module: resolved_module,
                            name: resolved_name,
                            type_args,
                        }
                    }
                    Some(resolved) => self.realize_depth(&resolved, depth + 1),
                    None => Type::Unknown,
                }
            }
            other => other.clone(),
        }
    }

    /// Resolve a syntactic type reference, reporting every name in it that
    /// does not resolve. Used at declaration sites.
    pub fn resolve_type_node(&self, node: &TypeRefNode, diagnostics: &mut Diagnostics) -> Type {
        self.check_type_node(node, diagnostics);
        Type::from_ref_node(node)
    }

    fn check_type_node(&self, node: &TypeRefNode, diagnostics: &mut Diagnostics) {
        node.visit(&mut |child| {
            if let crate::ast::NodeRef::TypeRef(TypeRefNode::Named {
                path, type_args, ..
            }) = child
            {
                self.check_named_type(path, type_args.len(), diagnostics);
            }
        });
    }

    fn check_named_type(
        &self,
        path: &[crate::parsing::WithSpan<String>],
        type_args: usize,
        diagnostics: &mut Diagnostics,
    ) {
        let (Some(first), Some(last)) = (path.first(), path.last()) else {
            return;
        };
        let span = Span::new(first.span.start, last.span.end);
        match path {
            [single] => {
                let name = &single.value;
                if type_args == 0 && Type::builtin(name).is_some() {
                    return;
                }
                if !self.types.contains_key(name.as_str()) {
                    diagnostics.error(format!("undefined type `{name}`"), span);
                }
            }
            [prefix @ .., last] => {
                let module_name = prefix
                    .iter()
                    .map(|s| s.value.as_str())
                    .collect::<Vec<_>>()
                    .join("::");
                match self.find_module(&module_name) {
                    Some(module) => {
                        if module.find_type(&last.value).is_none() {
                            diagnostics.error(
                                format!(
                                    "module `{module_name}` has no type `{}`",
                                    last.value
                                ),
                                span,
                            );
                        }
                    }
                    None => {
                        diagnostics.error(format!("undefined module `{module_name}`"), span);
                    }
                }
            }
            [] => {}
        }
    }
}

/// A mutable binding in scope.
#[derive(Debug, Clone)]
pub struct LocalBinding {
    pub ty: Type,
    pub mutable: bool,
    pub span: Span,
}

/// One lexical scope of a body being validated. Scopes chain to their
/// parents; lookups walk the chain and fall back to module-level constants.
pub struct BlockContext<'a> {
    pub module: &'a ModuleContext<'a>,
    parent: Option<&'a BlockContext<'a>>,
    pub expected_return: Option<Type>,
    pub in_loop: bool,
    locals: IndexMap<String, LocalBinding>,
}

impl<'a> BlockContext<'a> {
    pub fn root(module: &'a ModuleContext<'a>, expected_return: Option<Type>) -> Self {
        BlockContext {
            module,
            parent: None,
            expected_return,
            in_loop: false,
            locals: IndexMap::new(),
        }
    }

    /// A nested scope with the same return expectation and loop state.
    pub fn child(&self) -> BlockContext<'_> {
        BlockContext {
            module: self.module,
            parent: Some(self),
            expected_return: self.expected_return.clone(),
            in_loop: self.in_loop,
            locals: IndexMap::new(),
        }
    }

    /// A nested scope inside a loop body: `break`/`continue` become legal.
    pub fn loop_child(&self) -> BlockContext<'_> {
        let mut child = self.child();
        child.in_loop = true;
        child
    }

    /// A lambda body: loops outside do not leak in, and the lambda's value
    /// is its body, so there is no return expectation.
    pub fn lambda_child(&self) -> BlockContext<'_> {
        let mut child = self.child();
        child.in_loop = false;
        child.expected_return = None;
        child
    }

    pub fn declare(&mut self, name: impl Into<String>, binding: LocalBinding) {
        self.locals.insert(name.into(), binding);
    }

    pub fn lookup(&self, name: &str) -> Option<&LocalBinding> {
        match self.locals.get(name) {
            Some(binding) => Some(binding),
            None => self.parent.and_then(|parent| parent.lookup(name)),
        }
    }
}
