//! Indented tree rendering of a module, for the CLI `ast` command and the
//! grammar tests.

use std::fmt::Write;

use super::expr::{AssignTarget, BlockItem, DeclarationTarget, Expression};
use super::item::{ImplItem, ModuleItem};
use super::module::ModuleNode;

pub fn format_module(module: &ModuleNode) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Module {}", module.name);
    for item in &module.items {
        fmt_item(item, 1, &mut out);
    }
    out
}

pub fn format_expression(expr: &Expression) -> String {
    let mut out = String::new();
    fmt_expr(expr, 0, &mut out);
    out
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn fmt_item(item: &ModuleItem, depth: usize, out: &mut String) {
    indent(depth, out);
    match item {
        ModuleItem::Constant(decl) => {
            let _ = write!(out, "Constant {}", decl.name.value);
            if let Some(ty) = &decl.declared_type {
                let _ = write!(out, " : {ty}");
            }
            out.push('\n');
            fmt_expr(&decl.initializer, depth + 1, out);
        }
        ModuleItem::Function(decl) => {
            let kind = if decl.is_async() { "Function" } else { "SyncFunction" };
            let _ = write!(out, "{kind} {}(", decl.name.value);
            for (i, parameter) in decl.parameters.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&parameter.name.value);
                if let Some(ty) = &parameter.ty {
                    let _ = write!(out, " : {ty}");
                }
                if parameter.default.is_some() {
                    out.push_str(" = ...");
                }
            }
            let _ = writeln!(out, ") -> {}", decl.return_type);
            fmt_expr(&decl.body, depth + 1, out);
        }
        ModuleItem::Type(decl) => {
            let _ = writeln!(out, "Type {} = {}", decl.name.value, decl.definition);
        }
        ModuleItem::Impl(decl) => {
            let _ = writeln!(out, "Impl {}", decl.name.value);
            for method in &decl.methods {
                match method {
                    ImplItem::Method(method) => {
                        fmt_item(&ModuleItem::Function(method.clone()), depth + 1, out)
                    }
                    ImplItem::Comment(comment) => {
                        indent(depth + 1, out);
                        let _ = writeln!(out, "Comment {:?}", comment.text);
                    }
                    ImplItem::Error(error) => {
                        indent(depth + 1, out);
                        let _ = writeln!(out, "Error {:?}", error.expected);
                    }
                }
            }
        }
        ModuleItem::Comment(comment) => {
            let _ = writeln!(out, "Comment {:?}", comment.text);
        }
        ModuleItem::Error(error) => {
            let _ = writeln!(out, "Error {:?}", error.expected);
        }
    }
}

fn fmt_expr(expr: &Expression, depth: usize, out: &mut String) {
    indent(depth, out);
    match expr {
        Expression::LiteralBool { value, .. } => {
            let _ = writeln!(out, "Bool {value}");
        }
        Expression::LiteralInt { value, .. } => {
            let _ = writeln!(out, "Int {value}");
        }
        Expression::LiteralFloat { value, .. } => {
            let _ = writeln!(out, "Float {value}");
        }
        Expression::LiteralString { value, .. } => {
            let _ = writeln!(out, "String {value:?}");
        }
        Expression::VariableGet { path, .. } => {
            let _ = writeln!(out, "Variable {}", join_path(path));
        }
        Expression::Call { path, args, .. } => {
            let _ = writeln!(out, "Call {}", join_path(path));
            for arg in args {
                fmt_expr(arg, depth + 1, out);
            }
        }
        Expression::Block { items, .. } => {
            let _ = writeln!(out, "Block");
            for item in items {
                match item {
                    BlockItem::Expression(expr) => fmt_expr(expr, depth + 1, out),
                    BlockItem::Comment(comment) => {
                        indent(depth + 1, out);
                        let _ = writeln!(out, "Comment {:?}", comment.text);
                    }
                }
            }
        }
        Expression::If {
            condition,
            then_body,
            else_body,
            ..
        } => {
            let _ = writeln!(out, "If");
            fmt_expr(condition, depth + 1, out);
            fmt_expr(then_body, depth + 1, out);
            if let Some(else_body) = else_body {
                fmt_expr(else_body, depth + 1, out);
            }
        }
        Expression::While {
            condition, body, ..
        } => {
            let _ = writeln!(out, "While");
            fmt_expr(condition, depth + 1, out);
            fmt_expr(body, depth + 1, out);
        }
        Expression::ForIn {
            variable,
            source,
            body,
            ..
        } => {
            let _ = writeln!(out, "ForIn {}", variable.name.value);
            fmt_expr(source, depth + 1, out);
            fmt_expr(body, depth + 1, out);
        }
        Expression::ForInDeconstruct {
            variables,
            source,
            body,
            ..
        } => {
            let names: Vec<&str> = variables
                .iter()
                .map(|target| match target {
                    DeclarationTarget::Binding(binding) => binding.name.value.as_str(),
                    DeclarationTarget::Placeholder(_) => "_",
                })
                .collect();
            let _ = writeln!(out, "ForIn ({})", names.join(", "));
            fmt_expr(source, depth + 1, out);
            fmt_expr(body, depth + 1, out);
        }
        Expression::Break { .. } => {
            let _ = writeln!(out, "Break");
        }
        Expression::Continue { .. } => {
            let _ = writeln!(out, "Continue");
        }
        Expression::Return { value, .. } => {
            let _ = writeln!(out, "Return");
            if let Some(value) = value {
                fmt_expr(value, depth + 1, out);
            }
        }
        Expression::Binary {
            left, op, right, ..
        } => {
            let _ = writeln!(out, "Binary {}", op.value);
            fmt_expr(left, depth + 1, out);
            fmt_expr(right, depth + 1, out);
        }
        Expression::BinaryBool {
            left, op, right, ..
        } => {
            let _ = writeln!(out, "BinaryBool {}", op.value);
            fmt_expr(left, depth + 1, out);
            fmt_expr(right, depth + 1, out);
        }
        Expression::UnaryPrefix { op, right, .. } => {
            let _ = writeln!(out, "Unary {}", op.value);
            fmt_expr(right, depth + 1, out);
        }
        Expression::FieldGet { target, field, .. } => {
            let _ = writeln!(out, "FieldGet {}", field.value);
            fmt_expr(target, depth + 1, out);
        }
        Expression::MethodCall {
            target,
            method,
            args,
            ..
        } => {
            let _ = writeln!(out, "MethodCall {}", method.value);
            fmt_expr(target, depth + 1, out);
            for arg in args {
                fmt_expr(arg, depth + 1, out);
            }
        }
        Expression::IndexGet { target, index, .. } => {
            let _ = writeln!(out, "IndexGet");
            fmt_expr(target, depth + 1, out);
            fmt_expr(index, depth + 1, out);
        }
        Expression::Unwrap { target, .. } => {
            let _ = writeln!(out, "Unwrap");
            fmt_expr(target, depth + 1, out);
        }
        Expression::VariableAssign {
            name, op, value, ..
        } => {
            let _ = writeln!(out, "Assign {} {op}", name.value);
            fmt_expr(value, depth + 1, out);
        }
        Expression::FieldAssign {
            target,
            field,
            op,
            value,
            ..
        } => {
            let _ = writeln!(out, "FieldAssign {} {op}", field.value);
            fmt_expr(target, depth + 1, out);
            fmt_expr(value, depth + 1, out);
        }
        Expression::IndexAssign {
            target,
            index,
            op,
            value,
            ..
        } => {
            let _ = writeln!(out, "IndexAssign {op}");
            fmt_expr(target, depth + 1, out);
            fmt_expr(index, depth + 1, out);
            fmt_expr(value, depth + 1, out);
        }
        Expression::TupleDeconstructAssign { targets, value, .. } => {
            let names: Vec<String> = targets
                .iter()
                .map(|target| match target {
                    AssignTarget::Skip(_) => "_".to_string(),
                    AssignTarget::Variable(name) => name.value.clone(),
                    AssignTarget::Renamed { field, name } => {
                        format!("{} @ {}", field.value, name.value)
                    }
                })
                .collect();
            let _ = writeln!(out, "TupleAssign ({})", names.join(", "));
            fmt_expr(value, depth + 1, out);
        }
        Expression::VariableDeclaration {
            is_const,
            declaration,
            value,
            ..
        } => {
            let keyword = if *is_const { "Const" } else { "Let" };
            let _ = write!(out, "{keyword} {}", declaration.name.value);
            if let Some(ty) = &declaration.ty {
                let _ = write!(out, " : {ty}");
            }
            out.push('\n');
            fmt_expr(value, depth + 1, out);
        }
        Expression::TupleDeconstructDeclaration {
            is_const,
            declarations,
            value,
            ..
        } => {
            let keyword = if *is_const { "Const" } else { "Let" };
            let names: Vec<&str> = declarations
                .iter()
                .map(|target| match target {
                    DeclarationTarget::Binding(binding) => binding.name.value.as_str(),
                    DeclarationTarget::Placeholder(_) => "_",
                })
                .collect();
            let _ = writeln!(out, "{keyword} ({})", names.join(", "));
            fmt_expr(value, depth + 1, out);
        }
        Expression::TupleCreate { elements, .. } => {
            let _ = writeln!(out, "Tuple");
            for element in elements {
                fmt_expr(element, depth + 1, out);
            }
        }
        Expression::ArrayCreate { elements, .. } => {
            let _ = writeln!(out, "Array");
            for element in elements {
                fmt_expr(element, depth + 1, out);
            }
        }
        Expression::RecordCreate { fields, .. } => {
            let _ = writeln!(out, "Record");
            for (name, value) in fields {
                indent(depth + 1, out);
                let _ = writeln!(out, "Field {}", name.value);
                fmt_expr(value, depth + 2, out);
            }
        }
        Expression::RangeCreate {
            from, to, inclusive, ..
        } => {
            let _ = writeln!(out, "Range {}", if *inclusive { "..." } else { ".." });
            fmt_expr(from, depth + 1, out);
            fmt_expr(to, depth + 1, out);
        }
        Expression::Lambda {
            parameters, body, ..
        } => {
            let names: Vec<&str> = parameters
                .iter()
                .map(|parameter| parameter.name.value.as_str())
                .collect();
            let _ = writeln!(out, "Lambda ({})", names.join(", "));
            fmt_expr(body, depth + 1, out);
        }
        Expression::Unapply {
            pattern,
            extracted,
            value,
            ..
        } => {
            let names: Vec<&str> = extracted.iter().map(|name| name.value.as_str()).collect();
            let _ = writeln!(out, "Unapply {}({})", pattern.value, names.join(", "));
            fmt_expr(value, depth + 1, out);
        }
        Expression::Error(error) => {
            let _ = writeln!(out, "Error {:?}", error.expected);
        }
    }
}

fn join_path(path: &[crate::parsing::WithSpan<String>]) -> String {
    path.iter()
        .map(|segment| segment.value.as_str())
        .collect::<Vec<_>>()
        .join("::")
}
