//! Per-item validation: pass 1 declares, pass 2 checks bodies.

use crate::ast::{FunctionDeclaration, ImplItem, ModuleItem};
use crate::diagnostics::Diagnostics;
use crate::types::{FunctionType, Type, WithDefinition};

use super::context::{BlockContext, LocalBinding, ModuleContext};
use super::expr;

/// Pass 1: register the item's names. Only shape-level information is
/// touched — no body is inspected, which is what makes forward and mutual
/// references between items work.
pub(super) fn declare(
    item: &ModuleItem,
    ctx: &mut ModuleContext<'_>,
    diagnostics: &mut Diagnostics,
) {
    match item {
        ModuleItem::Constant(decl) => {
            if ctx.constants.contains_key(decl.name.value.as_str()) {
                diagnostics.error(
                    format!("duplicate constant `{}`", decl.name.value),
                    decl.name.span,
                );
                return;
            }
            let ty = decl
                .declared_type
                .as_ref()
                .map(Type::from_ref_node)
                .unwrap_or(Type::Unknown);
            ctx.constants.insert(
                decl.name.value.clone(),
                WithDefinition::defined_at(ty, ctx.module_name, decl.name.span),
            );
        }
        ModuleItem::Function(decl) => {
            if ctx.functions.contains_key(decl.name.value.as_str()) {
                diagnostics.error(
                    format!("duplicate function `{}`", decl.name.value),
                    decl.name.span,
                );
                return;
            }
            ctx.functions.insert(
                decl.name.value.clone(),
                WithDefinition::defined_at(
                    FunctionType::from_declaration(decl),
                    ctx.module_name,
                    decl.name.span,
                ),
            );
        }
        ModuleItem::Type(decl) => {
            if ctx.types.contains_key(decl.name.value.as_str()) {
                diagnostics.error(
                    format!("duplicate type `{}`", decl.name.value),
                    decl.name.span,
                );
                return;
            }
            ctx.types.insert(
                decl.name.value.clone(),
                Type::from_ref_node(&decl.definition),
            );
        }
        ModuleItem::Impl(impl_decl) => {
            let methods = ctx
                .methods
                .entry(impl_decl.name.value.clone())
                .or_default();
            for impl_item in &impl_decl.methods {
                let ImplItem::Method(method) = impl_item else {
                    continue;
                };
                if methods.contains_key(method.name.value.as_str()) {
                    diagnostics.error(
                        format!(
                            "duplicate method `{}` on `{}`",
                            method.name.value, impl_decl.name.value
                        ),
                        method.name.span,
                    );
                    continue;
                }
                methods.insert(
                    method.name.value.clone(),
                    FunctionType::from_declaration(method),
                );
            }
        }
        ModuleItem::Comment(_) | ModuleItem::Error(_) => {}
    }
}

/// Pass 2: check the item's declared types and body against the full
/// pass-1 symbol table.
pub(super) fn check(item: &ModuleItem, ctx: &ModuleContext<'_>, diagnostics: &mut Diagnostics) {
    match item {
        ModuleItem::Constant(decl) => {
            let declared = decl
                .declared_type
                .as_ref()
                .map(|node| ctx.resolve_type_node(node, diagnostics));
            let mut block = BlockContext::root(ctx, None);
            expr::check(&decl.initializer, &mut block, diagnostics);
            if let Some(declared) = declared {
                let declared = ctx.realize(&declared);
                let inferred = ctx.realize(&decl.initializer.result_type(&block));
                if !declared.is_assignable_from(&inferred) {
                    diagnostics.error(
                        format!("type mismatch: expected {declared}, found {inferred}"),
                        decl.initializer.span(),
                    );
                }
            }
        }
        ModuleItem::Function(decl) => check_function(decl, None, ctx, diagnostics),
        ModuleItem::Type(decl) => {
            ctx.resolve_type_node(&decl.definition, diagnostics);
        }
        ModuleItem::Impl(impl_decl) => {
            let self_type = if ctx.types.contains_key(impl_decl.name.value.as_str()) {
                Type::Reference {
                    module: None,
                    name: impl_decl.name.value.clone(),
                    type_args: Vec::new(),
                }
            } else {
                diagnostics.error(
                    format!("undefined type `{}`", impl_decl.name.value),
                    impl_decl.name.span,
                );
                Type::Unknown
            };
            for impl_item in &impl_decl.methods {
                match impl_item {
                    ImplItem::Method(method) => {
                        check_function(method, Some(self_type.clone()), ctx, diagnostics)
                    }
                    ImplItem::Comment(_) => {}
                    ImplItem::Error(error) => {
                        diagnostics.error(format!("expected {}", error.expected), error.span)
                    }
                }
            }
        }
        ModuleItem::Comment(_) => {}
        ModuleItem::Error(error) => {
            diagnostics.error(format!("expected {}", error.expected), error.span);
        }
    }
}

fn check_function(
    decl: &FunctionDeclaration,
    self_type: Option<Type>,
    ctx: &ModuleContext<'_>,
    diagnostics: &mut Diagnostics,
) {
    ctx.resolve_type_node(&decl.return_type, diagnostics);
    let return_type = ctx.realize(&Type::from_ref_node(&decl.return_type));

    let mut block = BlockContext::root(ctx, Some(return_type.clone()));
    let has_receiver = self_type.is_some();
    if let Some(self_type) = self_type {
        block.declare(
            "self",
            LocalBinding {
                ty: self_type,
                mutable: false,
                span: decl.name.span,
            },
        );
    }

    for parameter in &decl.parameters {
        // The untyped `self` parameter of a method is the receiver binding
        // declared above, not an ordinary parameter.
        if has_receiver && parameter.name.value == "self" && parameter.ty.is_none() {
            continue;
        }
        // Bindings keep the unrealized type: method lookup needs the
        // nominal name that realization would erase.
        let ty = match &parameter.ty {
            Some(node) => ctx.resolve_type_node(node, diagnostics),
            None => Type::Unknown,
        };
        if let Some(default) = &parameter.default {
            expr::check(default, &mut block, diagnostics);
            let expected = ctx.realize(&ty);
            let default_ty = ctx.realize(&default.result_type(&block));
            if !expected.is_assignable_from(&default_ty) {
                diagnostics.error(
                    format!("type mismatch: expected {expected}, found {default_ty}"),
                    default.span(),
                );
            }
        }
        block.declare(
            parameter.name.value.clone(),
            LocalBinding {
                ty,
                mutable: false,
                span: parameter.name.span,
            },
        );
    }

    expr::check(&decl.body, &mut block, diagnostics);
    let body_ty = ctx.realize(&decl.body.result_type(&block));
    if !return_type.is_assignable_from(&body_ty) {
        diagnostics.error(
            format!("type mismatch: expected {return_type}, found {body_ty}"),
            decl.body.span(),
        );
    }
}
