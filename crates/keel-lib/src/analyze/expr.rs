//! Expression validation (pass 2) and the `result_type` query.
//!
//! `check` walks an expression reporting soft diagnostics; `result_type` is
//! the pure query the code generator relies on once a module validates
//! cleanly. Both use the same resolution helpers so they cannot disagree.

use crate::ast::{
    AssignTarget, BinaryOp, BlockItem, DeclarationTarget, Expression, UnaryOp,
};
use crate::diagnostics::Diagnostics;
use crate::parsing::{Span, WithSpan};
use crate::types::{FunctionType, FunctionTypeParameter, Type};

use super::context::{BlockContext, LocalBinding};

pub(super) fn split_path(path: &[WithSpan<String>]) -> (String, String) {
    match path.split_last() {
        Some((last, prefix)) => {
            let module = prefix
                .iter()
                .map(|segment| segment.value.as_str())
                .collect::<Vec<_>>()
                .join("::");
            (module, last.value.clone())
        }
        None => (String::new(), String::new()),
    }
}

/// The type a (possibly qualified) value reference resolves to, if any.
pub(super) fn lookup_value_type(ctx: &BlockContext<'_>, path: &[WithSpan<String>]) -> Option<Type> {
    if let [single] = path {
        let name = single.value.as_str();
        if let Some(binding) = ctx.lookup(name) {
            return Some(binding.ty.clone());
        }
        if let Some(constant) = ctx.module.constants.get(name) {
            return Some(constant.value.clone());
        }
        if let Some(function) = ctx.module.functions.get(name) {
            return Some(Type::Function(Box::new(function.value.clone())));
        }
        return None;
    }
    let (module_name, member) = split_path(path);
    let module = ctx.module.find_module(&module_name)?;
    if let Some(constant) = module.find_constant(&member) {
        return Some(constant.value);
    }
    module
        .find_function(&member)
        .map(|function| Type::Function(Box::new(function.value)))
}

/// The signature a call path resolves to: a declared function, or any
/// binding/constant whose type is a function type.
pub(super) fn resolve_function(
    ctx: &BlockContext<'_>,
    path: &[WithSpan<String>],
) -> Option<FunctionType> {
    if let [single] = path {
        let name = single.value.as_str();
        if let Some(binding) = ctx.lookup(name) {
            if let Type::Function(function) = ctx.module.realize(&binding.ty) {
                return Some(*function);
            }
        }
        if let Some(function) = ctx.module.functions.get(name) {
            return Some(function.value.clone());
        }
        if let Some(constant) = ctx.module.constants.get(name) {
            if let Type::Function(function) = ctx.module.realize(&constant.value) {
                return Some(*function);
            }
        }
        return None;
    }
    let (module_name, member) = split_path(path);
    let module = ctx.module.find_module(&module_name)?;
    if let Some(function) = module.find_function(&member) {
        return Some(function.value);
    }
    if let Some(constant) = module.find_constant(&member) {
        if let Type::Function(function) = ctx.module.realize(&constant.value) {
            return Some(*function);
        }
    }
    None
}

/// Field lookup on a realized target type.
pub(super) fn field_type(ctx: &BlockContext<'_>, target: &Type, field: &str) -> Option<Type> {
    match target {
        Type::Record(fields) => fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, ty)| ty.clone()),
        Type::Reference {
            module: Some(module),
            name,
            ..
        } => ctx
            .module
            .find_module(module)?
            .find_field(name, field)
            .map(|ty| ctx.module.realize(&ty)),
        _ => None,
    }
}

/// A method seen from a call site: the `self` receiver, when declared, is
/// bound by the dot syntax and does not count as an argument.
pub(super) fn without_receiver(mut function: FunctionType) -> FunctionType {
    if function
        .parameters
        .first()
        .is_some_and(|parameter| parameter.name == "self")
    {
        function.parameters.remove(0);
    }
    function
}

/// Method lookup on an *unrealized* target type: methods attach to the
/// nominal name, which realization would erase.
pub(super) fn method_type(ctx: &BlockContext<'_>, target: &Type, method: &str) -> Option<FunctionType> {
    match target {
        Type::Reference {
            module: None, name, ..
        } => ctx.module.methods.get(name)?.get(method).cloned(),
        Type::Reference {
            module: Some(module),
            name,
            ..
        } => {
            if module == ctx.module.module_name {
                ctx.module.methods.get(name)?.get(method).cloned()
            } else {
                ctx.module.find_module(module)?.find_method(name, method)
            }
        }
        _ => None,
    }
}

fn numeric_result(left: &Type, right: &Type) -> Type {
    if matches!(left, Type::Float) || matches!(right, Type::Float) {
        Type::Float
    } else if matches!(left, Type::Unknown) || matches!(right, Type::Unknown) {
        Type::Unknown
    } else {
        Type::Int
    }
}

/// `None` when the operand types are fine, otherwise the complaint.
fn binary_operand_error(op: BinaryOp, left: &Type, right: &Type) -> Option<String> {
    if matches!(left, Type::Unknown) || matches!(right, Type::Unknown) {
        return None;
    }
    let ok = match op {
        BinaryOp::Add => {
            (left.is_numeric() && right.is_numeric())
                || (matches!(left, Type::String) && matches!(right, Type::String))
        }
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            left.is_numeric() && right.is_numeric()
        }
        BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => {
            matches!(left, Type::Int) && matches!(right, Type::Int)
        }
        BinaryOp::Eq | BinaryOp::Ne => {
            left.is_assignable_from(right)
                || right.is_assignable_from(left)
                || (left.is_numeric() && right.is_numeric())
        }
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            (left.is_numeric() && right.is_numeric())
                || (matches!(left, Type::String) && matches!(right, Type::String))
        }
    };
    if ok {
        None
    } else {
        Some(format!("operator `{op}` cannot be applied to {left} and {right}"))
    }
}

fn type_mismatch(diagnostics: &mut Diagnostics, expected: &Type, found: &Type, span: Span) {
    diagnostics.error(
        format!("type mismatch: expected {expected}, found {found}"),
        span,
    );
}

fn check_call_arguments(
    name: &str,
    function: &FunctionType,
    args: &[Expression],
    ctx: &BlockContext<'_>,
    diagnostics: &mut Diagnostics,
    span: Span,
) {
    let required = function.required_parameters();
    let total = function.parameters.len();
    if args.len() < required || args.len() > total {
        let expected = if required == total {
            format!("{total}")
        } else {
            format!("{required} to {total}")
        };
        diagnostics.error(
            format!(
                "function `{name}` expects {expected} argument(s), found {}",
                args.len()
            ),
            span,
        );
    }
    for (arg, parameter) in args.iter().zip(&function.parameters) {
        let expected = ctx.module.realize(&parameter.ty);
        let found = ctx.module.realize(&arg.result_type(ctx));
        if !expected.is_assignable_from(&found) {
            type_mismatch(diagnostics, &expected, &found, arg.span());
        }
    }
}

fn check_condition(condition: &Expression, ctx: &BlockContext<'_>, diagnostics: &mut Diagnostics) {
    let ty = ctx.module.realize(&condition.result_type(ctx));
    if !matches!(ty, Type::Bool | Type::Unknown) {
        diagnostics.error(
            format!("condition must be bool, found {ty}"),
            condition.span(),
        );
    }
}

/// Validate one expression, reporting diagnostics and extending `ctx` with
/// any bindings the expression introduces.
pub(super) fn check(expr: &Expression, ctx: &mut BlockContext<'_>, diagnostics: &mut Diagnostics) {
    match expr {
        Expression::LiteralBool { .. }
        | Expression::LiteralInt { .. }
        | Expression::LiteralFloat { .. }
        | Expression::LiteralString { .. } => {}
        Expression::Break { span } => {
            if !ctx.in_loop {
                diagnostics.error("`break` outside of a loop", *span);
            }
        }
        Expression::Continue { span } => {
            if !ctx.in_loop {
                diagnostics.error("`continue` outside of a loop", *span);
            }
        }
        Expression::VariableGet { path, span } => {
            if lookup_value_type(ctx, path).is_some() {
                return;
            }
            if let [single] = path.as_slice() {
                diagnostics.error(
                    format!("undefined variable `{}`", single.value),
                    *span,
                );
            } else {
                let (module_name, member) = split_path(path);
                if ctx.module.find_module(&module_name).is_none() {
                    diagnostics.error(format!("undefined module `{module_name}`"), *span);
                } else {
                    diagnostics.error(
                        format!("module `{module_name}` has no member `{member}`"),
                        *span,
                    );
                }
            }
        }
        Expression::Call { path, args, span } => {
            for arg in args {
                check(arg, ctx, diagnostics);
            }
            let display_name = path
                .iter()
                .map(|segment| segment.value.as_str())
                .collect::<Vec<_>>()
                .join("::");
            match resolve_function(ctx, path) {
                Some(function) => {
                    check_call_arguments(&display_name, &function, args, ctx, diagnostics, *span);
                }
                None => {
                    if let [single] = path.as_slice() {
                        diagnostics.error(
                            format!("undefined function `{}`", single.value),
                            *span,
                        );
                    } else {
                        let (module_name, member) = split_path(path);
                        if ctx.module.find_module(&module_name).is_none() {
                            diagnostics
                                .error(format!("undefined module `{module_name}`"), *span);
                        } else {
                            diagnostics.error(
                                format!("module `{module_name}` has no function `{member}`"),
                                *span,
                            );
                        }
                    }
                }
            }
        }
        Expression::Block { items, .. } => {
            let mut child = ctx.child();
            for item in items {
                if let BlockItem::Expression(expr) = item {
                    check(expr, &mut child, diagnostics);
                }
            }
        }
        Expression::If {
            condition,
            then_body,
            else_body,
            ..
        } => {
            check(condition, ctx, diagnostics);
            check_condition(condition, ctx, diagnostics);
            let mut then_ctx = ctx.child();
            check(then_body, &mut then_ctx, diagnostics);
            if let Some(else_body) = else_body {
                let mut else_ctx = ctx.child();
                check(else_body, &mut else_ctx, diagnostics);
            }
        }
        Expression::While {
            condition, body, ..
        } => {
            check(condition, ctx, diagnostics);
            check_condition(condition, ctx, diagnostics);
            let mut body_ctx = ctx.loop_child();
            check(body, &mut body_ctx, diagnostics);
        }
        Expression::ForIn {
            variable,
            source,
            body,
            ..
        } => {
            check(source, ctx, diagnostics);
            let element = iteration_element(source, ctx, diagnostics);
            let ty = match &variable.ty {
                Some(node) => {
                    let declared = ctx.module.resolve_type_node(node, diagnostics);
                    let expected = ctx.module.realize(&declared);
                    if !expected.is_assignable_from(&element) {
                        type_mismatch(diagnostics, &expected, &element, node.span());
                    }
                    declared
                }
                None => element,
            };
            let mut body_ctx = ctx.loop_child();
            body_ctx.declare(
                variable.name.value.clone(),
                LocalBinding {
                    ty,
                    mutable: false,
                    span: variable.name.span,
                },
            );
            check(body, &mut body_ctx, diagnostics);
        }
        Expression::ForInDeconstruct {
            variables,
            source,
            body,
            span,
            ..
        } => {
            check(source, ctx, diagnostics);
            let element = iteration_element(source, ctx, diagnostics);
            let elements = match element {
                Type::Tuple(elements) => Some(elements),
                Type::Unknown => None,
                other => {
                    diagnostics.error(
                        format!("cannot deconstruct {other} into a tuple"),
                        *span,
                    );
                    None
                }
            };
            if let Some(elements) = &elements {
                if elements.len() != variables.len() {
                    diagnostics.error(
                        format!(
                            "tuple has {} element(s), found {} target(s)",
                            elements.len(),
                            variables.len()
                        ),
                        *span,
                    );
                }
            }
            let mut body_ctx = ctx.loop_child();
            for (index, target) in variables.iter().enumerate() {
                let DeclarationTarget::Binding(binding) = target else {
                    continue;
                };
                let ty = elements
                    .as_ref()
                    .and_then(|elements| elements.get(index).cloned())
                    .unwrap_or(Type::Unknown);
                body_ctx.declare(
                    binding.name.value.clone(),
                    LocalBinding {
                        ty,
                        mutable: false,
                        span: binding.name.span,
                    },
                );
            }
            check(body, &mut body_ctx, diagnostics);
        }
        Expression::Return { value, span, .. } => {
            if let Some(value) = value {
                check(value, ctx, diagnostics);
            }
            let found = match value {
                Some(value) => ctx.module.realize(&value.result_type(ctx)),
                None => Type::Unit,
            };
            if let Some(expected) = ctx.expected_return.clone() {
                let expected = ctx.module.realize(&expected);
                if !expected.is_assignable_from(&found) {
                    let span = value.as_ref().map(|v| v.span()).unwrap_or(*span);
                    type_mismatch(diagnostics, &expected, &found, span);
                }
            }
        }
        Expression::Binary {
            left, op, right, span,
        } => {
            check(left, ctx, diagnostics);
            check(right, ctx, diagnostics);
            let left_ty = ctx.module.realize(&left.result_type(ctx));
            let right_ty = ctx.module.realize(&right.result_type(ctx));
            if let Some(message) = binary_operand_error(op.value, &left_ty, &right_ty) {
                diagnostics.error(message, *span);
            }
        }
        Expression::BinaryBool {
            left, right, span, ..
        } => {
            check(left, ctx, diagnostics);
            check(right, ctx, diagnostics);
            for operand in [left, right] {
                let ty = ctx.module.realize(&operand.result_type(ctx));
                if !matches!(ty, Type::Bool | Type::Unknown) {
                    diagnostics.error(
                        format!("boolean operator requires bool operands, found {ty}"),
                        *span,
                    );
                }
            }
        }
        Expression::UnaryPrefix { op, right, span } => {
            check(right, ctx, diagnostics);
            let ty = ctx.module.realize(&right.result_type(ctx));
            let ok = match op.value {
                UnaryOp::Neg => ty.is_numeric() || matches!(ty, Type::Unknown),
                UnaryOp::Not => matches!(ty, Type::Bool | Type::Unknown),
                UnaryOp::BitNot => matches!(ty, Type::Int | Type::Unknown),
            };
            if !ok {
                diagnostics.error(
                    format!("operator `{}` cannot be applied to {ty}", op.value),
                    *span,
                );
            }
        }
        Expression::FieldGet {
            target, field, ..
        } => {
            check(target, ctx, diagnostics);
            let target_ty = ctx.module.realize(&target.result_type(ctx));
            if matches!(target_ty, Type::Unknown) {
                return;
            }
            if field_type(ctx, &target_ty, &field.value).is_none() {
                diagnostics.error(
                    format!("type {target_ty} has no field `{}`", field.value),
                    field.span,
                );
            }
        }
        Expression::MethodCall {
            target,
            method,
            args,
            span,
        } => {
            check(target, ctx, diagnostics);
            for arg in args {
                check(arg, ctx, diagnostics);
            }
            let raw = target.result_type(ctx);
            match method_type(ctx, &raw, &method.value) {
                Some(function) => {
                    let function = without_receiver(function);
                    check_call_arguments(&method.value, &function, args, ctx, diagnostics, *span);
                }
                None => {
                    let realized = ctx.module.realize(&raw);
                    if !matches!(realized, Type::Unknown) {
                        diagnostics.error(
                            format!("type {} has no method `{}`", realized, method.value),
                            method.span,
                        );
                    }
                }
            }
        }
        Expression::IndexGet {
            target, index, ..
        } => {
            check(target, ctx, diagnostics);
            check(index, ctx, diagnostics);
            let target_ty = ctx.module.realize(&target.result_type(ctx));
            if !matches!(target_ty, Type::Array(_) | Type::Unknown) {
                diagnostics.error(
                    format!("type {target_ty} cannot be indexed"),
                    target.span(),
                );
            }
            let index_ty = ctx.module.realize(&index.result_type(ctx));
            if !matches!(index_ty, Type::Int | Type::Unknown) {
                type_mismatch(diagnostics, &Type::Int, &index_ty, index.span());
            }
        }
        Expression::Unwrap { target, .. } => {
            check(target, ctx, diagnostics);
        }
        Expression::VariableAssign {
            name, op, value, ..
        } => {
            check(value, ctx, diagnostics);
            let value_ty = ctx.module.realize(&value.result_type(ctx));
            let Some(binding) = ctx.lookup(&name.value) else {
                if ctx.module.constants.contains_key(name.value.as_str()) {
                    diagnostics.error(
                        format!("cannot assign to constant `{}`", name.value),
                        name.span,
                    );
                } else {
                    diagnostics.error(
                        format!("undefined variable `{}`", name.value),
                        name.span,
                    );
                }
                return;
            };
            if !binding.mutable {
                diagnostics.error(
                    format!("cannot assign to immutable `{}`", name.value),
                    name.span,
                );
            }
            let target_ty = ctx.module.realize(&binding.ty);
            match op.binary_op() {
                Some(binary) => {
                    if let Some(message) = binary_operand_error(binary, &target_ty, &value_ty) {
                        diagnostics.error(message, value.span());
                    }
                }
                None => {
                    if !target_ty.is_assignable_from(&value_ty) {
                        type_mismatch(diagnostics, &target_ty, &value_ty, value.span());
                    }
                }
            }
        }
        Expression::FieldAssign {
            target,
            field,
            op,
            value,
            ..
        } => {
            check(target, ctx, diagnostics);
            check(value, ctx, diagnostics);
            let target_ty = ctx.module.realize(&target.result_type(ctx));
            let value_ty = ctx.module.realize(&value.result_type(ctx));
            match field_type(ctx, &target_ty, &field.value) {
                Some(field_ty) => {
                    check_assign_value(&field_ty, *op, &value_ty, value.span(), diagnostics)
                }
                None => {
                    if !matches!(target_ty, Type::Unknown) {
                        diagnostics.error(
                            format!("type {target_ty} has no field `{}`", field.value),
                            field.span,
                        );
                    }
                }
            }
        }
        Expression::IndexAssign {
            target,
            index,
            op,
            value,
            ..
        } => {
            check(target, ctx, diagnostics);
            check(index, ctx, diagnostics);
            check(value, ctx, diagnostics);
            let target_ty = ctx.module.realize(&target.result_type(ctx));
            let value_ty = ctx.module.realize(&value.result_type(ctx));
            let index_ty = ctx.module.realize(&index.result_type(ctx));
            if !matches!(index_ty, Type::Int | Type::Unknown) {
                type_mismatch(diagnostics, &Type::Int, &index_ty, index.span());
            }
            match target_ty {
                Type::Array(element) => {
                    check_assign_value(&element, *op, &value_ty, value.span(), diagnostics)
                }
                Type::Unknown => {}
                other => {
                    diagnostics.error(
                        format!("type {other} cannot be indexed"),
                        target.span(),
                    );
                }
            }
        }
        Expression::TupleDeconstructAssign {
            targets,
            value,
            span,
        } => {
            check(value, ctx, diagnostics);
            let value_ty = ctx.module.realize(&value.result_type(ctx));
            check_deconstruct_assign(targets, &value_ty, *span, ctx, diagnostics);
        }
        Expression::VariableDeclaration {
            is_const,
            declaration,
            value,
            ..
        } => {
            check(value, ctx, diagnostics);
            let inferred = value.result_type(ctx);
            // The binding keeps the unrealized type so later method lookups
            // still see the nominal name.
            let ty = match &declaration.ty {
                Some(node) => {
                    let declared = ctx.module.resolve_type_node(node, diagnostics);
                    let expected = ctx.module.realize(&declared);
                    let found = ctx.module.realize(&inferred);
                    if !expected.is_assignable_from(&found) {
                        type_mismatch(diagnostics, &expected, &found, value.span());
                    }
                    declared
                }
                None => inferred,
            };
            ctx.declare(
                declaration.name.value.clone(),
                LocalBinding {
                    ty,
                    mutable: !*is_const,
                    span: declaration.name.span,
                },
            );
        }
        Expression::TupleDeconstructDeclaration {
            is_const,
            declarations,
            value,
            span,
            ..
        } => {
            check(value, ctx, diagnostics);
            let value_ty = ctx.module.realize(&value.result_type(ctx));
            let elements = match value_ty {
                Type::Tuple(elements) => Some(elements),
                Type::Unknown => None,
                other => {
                    diagnostics.error(
                        format!("cannot deconstruct {other} into a tuple"),
                        *span,
                    );
                    None
                }
            };
            if let Some(elements) = &elements {
                if elements.len() != declarations.len() {
                    diagnostics.error(
                        format!(
                            "tuple has {} element(s), found {} target(s)",
                            elements.len(),
                            declarations.len()
                        ),
                        *span,
                    );
                }
            }
            for (index, target) in declarations.iter().enumerate() {
                let DeclarationTarget::Binding(binding) = target else {
                    continue;
                };
                let element = elements
                    .as_ref()
                    .and_then(|elements| elements.get(index).cloned())
                    .unwrap_or(Type::Unknown);
                let ty = match &binding.ty {
                    Some(node) => {
                        let declared = ctx.module.resolve_type_node(node, diagnostics);
                        let expected = ctx.module.realize(&declared);
                        if !expected.is_assignable_from(&element) {
                            type_mismatch(diagnostics, &expected, &element, node.span());
                        }
                        declared
                    }
                    None => element,
                };
                ctx.declare(
                    binding.name.value.clone(),
                    LocalBinding {
                        ty,
                        mutable: !*is_const,
                        span: binding.name.span,
                    },
                );
            }
        }
        Expression::TupleCreate { elements, .. } => {
            for element in elements {
                check(element, ctx, diagnostics);
            }
        }
        Expression::ArrayCreate {
            element_type,
            elements,
            ..
        } => {
            for element in elements {
                check(element, ctx, diagnostics);
            }
            if let Some(node) = element_type {
                let declared = ctx.module.resolve_type_node(node, diagnostics);
                let declared = ctx.module.realize(&declared);
                for element in elements {
                    let found = ctx.module.realize(&element.result_type(ctx));
                    if !declared.is_assignable_from(&found) {
                        type_mismatch(diagnostics, &declared, &found, element.span());
                    }
                }
            }
        }
        Expression::RecordCreate {
            declared_type,
            fields,
            span,
        } => {
            for (_, value) in fields {
                check(value, ctx, diagnostics);
            }
            let Some(node) = declared_type else {
                return;
            };
            let declared = ctx.module.resolve_type_node(node, diagnostics);
            let Type::Record(expected_fields) = ctx.module.realize(&declared) else {
                return;
            };
            for (name, expected) in &expected_fields {
                if !fields.iter().any(|(field, _)| &field.value == name) {
                    diagnostics.error(
                        format!("missing field `{name}` of type {expected}"),
                        *span,
                    );
                }
            }
            for (field, value) in fields {
                match expected_fields.iter().find(|(name, _)| name == &field.value) {
                    Some((_, expected)) => {
                        let expected = ctx.module.realize(expected);
                        let found = ctx.module.realize(&value.result_type(ctx));
                        if !expected.is_assignable_from(&found) {
                            type_mismatch(diagnostics, &expected, &found, value.span());
                        }
                    }
                    None => {
                        diagnostics.error(
                            format!("unknown field `{}`", field.value),
                            field.span,
                        );
                    }
                }
            }
        }
        Expression::RangeCreate { from, to, .. } => {
            check(from, ctx, diagnostics);
            check(to, ctx, diagnostics);
            for bound in [from, to] {
                let ty = ctx.module.realize(&bound.result_type(ctx));
                if !matches!(ty, Type::Int | Type::Unknown) {
                    diagnostics.error(
                        format!("range bounds must be int, found {ty}"),
                        bound.span(),
                    );
                }
            }
        }
        Expression::Lambda {
            parameters, body, ..
        } => {
            let mut body_ctx = ctx.lambda_child();
            for parameter in parameters {
                let ty = match &parameter.ty {
                    Some(node) => body_ctx.module.resolve_type_node(node, diagnostics),
                    None => Type::Unknown,
                };
                body_ctx.declare(
                    parameter.name.value.clone(),
                    LocalBinding {
                        ty,
                        mutable: false,
                        span: parameter.name.span,
                    },
                );
            }
            check(body, &mut body_ctx, diagnostics);
        }
        Expression::Unapply {
            extracted, value, ..
        } => {
            check(value, ctx, diagnostics);
            for name in extracted {
                ctx.declare(
                    name.value.clone(),
                    LocalBinding {
                        ty: Type::Unknown,
                        mutable: false,
                        span: name.span,
                    },
                );
            }
        }
        Expression::Error(error) => {
            diagnostics.error(format!("expected {}", error.expected), error.span);
        }
    }
}

fn check_assign_value(
    target: &Type,
    op: crate::ast::AssignOp,
    value: &Type,
    span: Span,
    diagnostics: &mut Diagnostics,
) {
    match op.binary_op() {
        Some(binary) => {
            if let Some(message) = binary_operand_error(binary, target, value) {
                diagnostics.error(message, span);
            }
        }
        None => {
            if !target.is_assignable_from(value) {
                diagnostics.error(
                    format!("type mismatch: expected {target}, found {value}"),
                    span,
                );
            }
        }
    }
}

fn check_deconstruct_assign(
    targets: &[AssignTarget],
    value_ty: &Type,
    span: Span,
    ctx: &BlockContext<'_>,
    diagnostics: &mut Diagnostics,
) {
    let elements: Option<Vec<(Option<String>, Type)>> = match value_ty {
        Type::Tuple(elements) => {
            Some(elements.iter().map(|ty| (None, ty.clone())).collect())
        }
        Type::Record(fields) => Some(
            fields
                .iter()
                .map(|(name, ty)| (Some(name.clone()), ty.clone()))
                .collect(),
        ),
        Type::Unknown => None,
        other => {
            diagnostics.error(format!("cannot deconstruct {other}"), span);
            None
        }
    };
    if let Some(elements) = &elements {
        if elements.len() != targets.len() {
            diagnostics.error(
                format!(
                    "value has {} element(s), found {} target(s)",
                    elements.len(),
                    targets.len()
                ),
                span,
            );
        }
    }
    for (index, target) in targets.iter().enumerate() {
        let (name, element) = match target {
            AssignTarget::Skip(_) => continue,
            AssignTarget::Variable(name) => {
                let element = elements
                    .as_ref()
                    .and_then(|elements| elements.get(index))
                    .map(|(_, ty)| ty.clone())
                    .unwrap_or(Type::Unknown);
                (name, element)
            }
            AssignTarget::Renamed { field, name } => {
                let element = elements
                    .as_ref()
                    .and_then(|elements| {
                        elements
                            .iter()
                            .find(|(element_name, _)| element_name.as_deref() == Some(field.value.as_str()))
                            .or_else(|| elements.get(index))
                    })
                    .map(|(_, ty)| ty.clone())
                    .unwrap_or(Type::Unknown);
                (name, element)
            }
        };
        match ctx.lookup(&name.value) {
            Some(binding) => {
                if !binding.mutable {
                    diagnostics.error(
                        format!("cannot assign to immutable `{}`", name.value),
                        name.span,
                    );
                }
                let target_ty = ctx.module.realize(&binding.ty);
                let element = ctx.module.realize(&element);
                if !target_ty.is_assignable_from(&element) {
                    type_mismatch(diagnostics, &target_ty, &element, name.span);
                }
            }
            None => {
                diagnostics.error(
                    format!("undefined variable `{}`", name.value),
                    name.span,
                );
            }
        }
    }
}

fn iteration_element(
    source: &Expression,
    ctx: &BlockContext<'_>,
    diagnostics: &mut Diagnostics,
) -> Type {
    let source_ty = ctx.module.realize(&source.result_type(ctx));
    match source_ty {
        Type::Array(element) => *element,
        Type::Range => Type::Int,
        Type::Unknown => Type::Unknown,
        other => {
            diagnostics.error(format!("cannot iterate over {other}"), source.span());
            Type::Unknown
        }
    }
}

/// Declarations extend the scope for later block items; this mirrors what
/// `check` does, without diagnostics, so `result_type` sees the same scope.
fn simulate_declaration(expr: &Expression, ctx: &mut BlockContext<'_>) {
    match expr {
        Expression::VariableDeclaration {
            is_const,
            declaration,
            value,
            ..
        } => {
            let ty = match &declaration.ty {
                Some(node) => Type::from_ref_node(node),
                None => value.result_type(ctx),
            };
            ctx.declare(
                declaration.name.value.clone(),
                LocalBinding {
                    ty,
                    mutable: !*is_const,
                    span: declaration.name.span,
                },
            );
        }
        Expression::TupleDeconstructDeclaration {
            is_const,
            declarations,
            value,
            ..
        } => {
            let elements = match ctx.module.realize(&value.result_type(ctx)) {
                Type::Tuple(elements) => elements,
                _ => Vec::new(),
            };
            for (index, target) in declarations.iter().enumerate() {
                let DeclarationTarget::Binding(binding) = target else {
                    continue;
                };
                let ty = match &binding.ty {
                    Some(node) => Type::from_ref_node(node),
                    None => elements.get(index).cloned().unwrap_or(Type::Unknown),
                };
                ctx.declare(
                    binding.name.value.clone(),
                    LocalBinding {
                        ty,
                        mutable: !*is_const,
                        span: binding.name.span,
                    },
                );
            }
        }
        Expression::Unapply { extracted, .. } => {
            for name in extracted {
                ctx.declare(
                    name.value.clone(),
                    LocalBinding {
                        ty: Type::Unknown,
                        mutable: false,
                        span: name.span,
                    },
                );
            }
        }
        _ => {}
    }
}

fn block_result_type(items: &[BlockItem], ctx: &BlockContext<'_>) -> Type {
    let mut child = ctx.child();
    let mut last = Type::Unit;
    for item in items {
        let BlockItem::Expression(expr) = item else {
            continue;
        };
        last = expr.result_type(&child);
        simulate_declaration(expr, &mut child);
    }
    last
}

impl Expression {
    /// The type this expression evaluates to in `ctx`. Pure: never reports,
    /// degrades to [`Type::Unknown`] wherever resolution fails.
    pub fn result_type(&self, ctx: &BlockContext<'_>) -> Type {
        match self {
            Expression::LiteralBool { .. } => Type::Bool,
            Expression::LiteralInt { .. } => Type::Int,
            Expression::LiteralFloat { .. } => Type::Float,
            Expression::LiteralString { .. } => Type::String,
            Expression::VariableGet { path, .. } => {
                lookup_value_type(ctx, path).unwrap_or(Type::Unknown)
            }
            Expression::Call { path, .. } => resolve_function(ctx, path)
                .map(|function| ctx.module.realize(&function.return_type))
                .unwrap_or(Type::Unknown),
            Expression::Block { items, .. } => block_result_type(items, ctx),
            Expression::If {
                then_body,
                else_body,
                ..
            } => match else_body {
                Some(_) => then_body.result_type(&ctx.child()),
                None => Type::Unit,
            },
            Expression::While { .. }
            | Expression::ForIn { .. }
            | Expression::ForInDeconstruct { .. } => Type::Unit,
            // Control transfers have no value of their own; treating them as
            // Unknown keeps `{ return x }` assignable to any return type.
            Expression::Break { .. }
            | Expression::Continue { .. }
            | Expression::Return { .. } => Type::Unknown,
            Expression::Binary {
                left, op, right, ..
            } => {
                let left_ty = ctx.module.realize(&left.result_type(ctx));
                let right_ty = ctx.module.realize(&right.result_type(ctx));
                if op.value.is_comparison() {
                    Type::Bool
                } else if op.value.is_bitwise() {
                    Type::Int
                } else if matches!(op.value, BinaryOp::Add)
                    && matches!(left_ty, Type::String)
                    && matches!(right_ty, Type::String)
                {
                    Type::String
                } else {
                    numeric_result(&left_ty, &right_ty)
                }
            }
            Expression::BinaryBool { .. } => Type::Bool,
            Expression::UnaryPrefix { op, right, .. } => match op.value {
                UnaryOp::Not => Type::Bool,
                UnaryOp::BitNot => Type::Int,
                UnaryOp::Neg => ctx.module.realize(&right.result_type(ctx)),
            },
            Expression::FieldGet { target, field, .. } => {
                let target_ty = ctx.module.realize(&target.result_type(ctx));
                field_type(ctx, &target_ty, &field.value).unwrap_or(Type::Unknown)
            }
            Expression::MethodCall { target, method, .. } => {
                let raw = target.result_type(ctx);
                method_type(ctx, &raw, &method.value)
                    .map(|function| ctx.module.realize(&function.return_type))
                    .unwrap_or(Type::Unknown)
            }
            Expression::IndexGet { target, .. } => {
                match ctx.module.realize(&target.result_type(ctx)) {
                    Type::Array(element) => *element,
                    _ => Type::Unknown,
                }
            }
            Expression::Unwrap { target, .. } => target.result_type(ctx),
            Expression::VariableAssign { .. }
            | Expression::FieldAssign { .. }
            | Expression::IndexAssign { .. }
            | Expression::TupleDeconstructAssign { .. } => Type::Unit,
            Expression::VariableDeclaration { value, .. } => value.result_type(ctx),
            Expression::TupleDeconstructDeclaration { .. } => Type::Unit,
            Expression::TupleCreate { elements, .. } => Type::Tuple(
                elements
                    .iter()
                    .map(|element| element.result_type(ctx))
                    .collect(),
            ),
            Expression::ArrayCreate {
                element_type,
                elements,
                ..
            } => {
                let element = match element_type {
                    Some(node) => Type::from_ref_node(node),
                    None => elements
                        .first()
                        .map(|element| element.result_type(ctx))
                        .unwrap_or(Type::Unknown),
                };
                Type::Array(Box::new(element))
            }
            Expression::RecordCreate {
                declared_type,
                fields,
                ..
            } => match declared_type {
                Some(node) => Type::from_ref_node(node),
                None => Type::Record(
                    fields
                        .iter()
                        .map(|(name, value)| (name.value.clone(), value.result_type(ctx)))
                        .collect(),
                ),
            },
            Expression::RangeCreate { .. } => Type::Range,
            Expression::Lambda {
                parameters, body, ..
            } => {
                let mut body_ctx = ctx.lambda_child();
                let mut signature_parameters = Vec::new();
                for parameter in parameters {
                    let ty = parameter
                        .ty
                        .as_ref()
                        .map(Type::from_ref_node)
                        .unwrap_or(Type::Unknown);
                    body_ctx.declare(
                        parameter.name.value.clone(),
                        LocalBinding {
                            ty: ty.clone(),
                            mutable: false,
                            span: parameter.name.span,
                        },
                    );
                    signature_parameters.push(FunctionTypeParameter {
                        name: parameter.name.value.clone(),
                        ty,
                        has_default: false,
                    });
                }
                let return_type = body.result_type(&body_ctx);
                Type::Function(Box::new(FunctionType {
                    is_async: false,
                    parameters: signature_parameters,
                    return_type,
                    description: String::new(),
                }))
            }
            Expression::Unapply { .. } => Type::Bool,
            Expression::Error(_) => Type::Unknown,
        }
    }
}
