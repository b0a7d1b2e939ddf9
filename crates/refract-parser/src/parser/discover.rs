//! Component discovery over top-level declarations.

use oxc_ast::ast::{
    BindingPatternKind, CallExpression, Declaration, ExportDefaultDeclarationKind, Expression,
    Statement, VariableDeclaration,
};
use oxc_span::GetSpan;

use crate::parser::syntax::{callee_name, text, unwrap_expr, Callback};

/// How a candidate component is defined.
pub(crate) enum CandidateKind<'b, 'a> {
    /// `forwardRef<T, P>((props, ref) => ...)`.
    ForwardRef {
        call: &'b CallExpression<'a>,
        callback: Callback<'b, 'a>,
    },
    /// A plain function or arrow component.
    Plain(Callback<'b, 'a>),
    /// `const X = Primitive.Sub`.
    ReExport(String),
}

pub(crate) struct Candidate<'b, 'a> {
    pub name: String,
    pub kind: CandidateKind<'b, 'a>,
}

/// Candidates in declaration order plus the name of the default export.
#[derive(Default)]
pub(crate) struct Discovery<'b, 'a> {
    pub candidates: Vec<Candidate<'b, 'a>>,
    pub default_export: Option<String>,
}

pub(crate) fn discover<'b, 'a>(source: &str, statements: &'b [Statement<'a>]) -> Discovery<'b, 'a> {
    let mut found = Discovery::default();

    for stmt in statements {
        match stmt {
            Statement::VariableDeclaration(decl) => variables(source, decl, &mut found),
            Statement::FunctionDeclaration(func) => {
                if let Some(id) = &func.id {
                    push_plain(&mut found, id.name.as_str(), Callback::Function(func));
                }
            }
            Statement::ExportNamedDeclaration(export) => match &export.declaration {
                Some(Declaration::VariableDeclaration(decl)) => variables(source, decl, &mut found),
                Some(Declaration::FunctionDeclaration(func)) => {
                    if let Some(id) = &func.id {
                        push_plain(&mut found, id.name.as_str(), Callback::Function(func));
                    }
                }
                _ => {}
            },
            Statement::ExportDefaultDeclaration(export) => match &export.declaration {
                ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                    if let Some(id) = &func.id {
                        push_plain(&mut found, id.name.as_str(), Callback::Function(func));
                        found.default_export = Some(id.name.to_string());
                    }
                }
                ExportDefaultDeclarationKind::Identifier(id) => {
                    found.default_export = Some(id.name.to_string());
                }
                _ => {}
            },
            _ => {}
        }
    }

    found
}

fn variables<'b, 'a>(source: &str, decl: &'b VariableDeclaration<'a>, found: &mut Discovery<'b, 'a>) {
    for declarator in &decl.declarations {
        let BindingPatternKind::BindingIdentifier(id) = &declarator.id.kind else {
            continue;
        };
        let name = id.name.as_str();
        if !is_component_name(name) {
            continue;
        }
        let Some(init) = &declarator.init else {
            continue;
        };

        match unwrap_expr(init) {
            Expression::CallExpression(call) => {
                if let Some(kind) = wrapper_call(call) {
                    tracing::debug!("Discovered component {}", name);
                    found.candidates.push(Candidate {
                        name: name.to_string(),
                        kind,
                    });
                }
            }
            Expression::StaticMemberExpression(member) => {
                let target = text(source, member.span()).to_string();
                tracing::debug!("Discovered re-export {} = {}", name, target);
                found.candidates.push(Candidate {
                    name: name.to_string(),
                    kind: CandidateKind::ReExport(target),
                });
            }
            other => {
                if let Some(callback) = Callback::from_expression(other) {
                    push_plain(found, name, callback);
                }
            }
        }
    }
}

/// `forwardRef(...)`, optionally wrapped in `memo(...)`.
fn wrapper_call<'b, 'a>(call: &'b CallExpression<'a>) -> Option<CandidateKind<'b, 'a>> {
    let callee = callee_name(call)?;
    let first = call.arguments.first()?.as_expression()?;
    match callee.as_str() {
        "forwardRef" => Some(CandidateKind::ForwardRef {
            call,
            callback: Callback::from_expression(first)?,
        }),
        "memo" => match unwrap_expr(first) {
            Expression::CallExpression(inner) => wrapper_call(inner),
            other => Callback::from_expression(other).map(CandidateKind::Plain),
        },
        _ => None,
    }
}

fn push_plain<'b, 'a>(found: &mut Discovery<'b, 'a>, name: &str, callback: Callback<'b, 'a>) {
    if !is_component_name(name) {
        return;
    }
    tracing::debug!("Discovered component {}", name);
    found.candidates.push(Candidate {
        name: name.to_string(),
        kind: CandidateKind::Plain(callback),
    });
}

fn is_component_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase())
}
