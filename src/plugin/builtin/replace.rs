use crate::errors::HookError;
use crate::parse::AstTools;
use crate::plugin::{Plugin, PluginContext, TransformAstHook};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use swc_core::ecma::ast::{
    BindingIdent, ClassDecl, Expr, FnDecl, ImportDefaultSpecifier, ImportNamedSpecifier,
    ImportStarAsSpecifier, Module,
};
use swc_core::ecma::visit::{Visit, VisitMut, VisitMutWith, VisitWith};

/// Replaces free identifiers with JavaScript expressions.
///
/// Each replacement value is JavaScript source text, parsed once per file
/// with [`AstTools::parse_expr`]. Identifiers that the module itself declares
/// anywhere are left untouched, as are property names.
///
/// ```rust
/// use transpipe::plugin::builtin::ReplacePlugin;
///
/// let plugin = ReplacePlugin::new()
///     .replace("ADJECTIVE", "\"cool\"")
///     .replace("DEBUG", "false")
///     .plugin();
/// assert!(plugin.transform_ast().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReplacePlugin {
    replacements: BTreeMap<String, String>,
}

impl ReplacePlugin {
    pub const NAME: &'static str = "replace";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(mut self, identifier: impl Into<String>, expression: impl Into<String>) -> Self {
        self.replacements.insert(identifier.into(), expression.into());
        self
    }

    pub fn plugin(self) -> Plugin {
        Plugin::new(Self::NAME).with_transform_ast(self)
    }
}

/// Names bound by declarations, parameters or imports in the module.
#[derive(Default)]
struct Bindings {
    names: HashSet<String>,
}

impl Visit for Bindings {
    fn visit_binding_ident(&mut self, node: &BindingIdent) {
        self.names.insert(node.id.sym.to_string());
    }

    fn visit_fn_decl(&mut self, node: &FnDecl) {
        self.names.insert(node.ident.sym.to_string());
        node.visit_children_with(self);
    }

    fn visit_class_decl(&mut self, node: &ClassDecl) {
        self.names.insert(node.ident.sym.to_string());
        node.visit_children_with(self);
    }

    fn visit_import_named_specifier(&mut self, node: &ImportNamedSpecifier) {
        self.names.insert(node.local.sym.to_string());
    }

    fn visit_import_default_specifier(&mut self, node: &ImportDefaultSpecifier) {
        self.names.insert(node.local.sym.to_string());
    }

    fn visit_import_star_as_specifier(&mut self, node: &ImportStarAsSpecifier) {
        self.names.insert(node.local.sym.to_string());
    }
}

struct Replacer {
    replacements: HashMap<String, Box<Expr>>,
    replaced: usize,
}

impl VisitMut for Replacer {
    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        if let Expr::Ident(ident) = expr {
            if let Some(replacement) = self.replacements.get(&*ident.sym) {
                *expr = (**replacement).clone();
                self.replaced += 1;
                return;
            }
        }
        expr.visit_mut_children_with(self);
    }
}

#[async_trait]
impl TransformAstHook for ReplacePlugin {
    async fn transform_ast(
        &self,
        _ctx: &PluginContext,
        module: &mut Module,
        tools: AstTools<'_>,
        path: &Path,
    ) -> Result<(), HookError> {
        let mut bindings = Bindings::default();
        module.visit_with(&mut bindings);

        let mut replacements = HashMap::new();
        for (identifier, source) in &self.replacements {
            if bindings.names.contains(identifier) {
                continue;
            }
            let expr = tools.parse_expr(source).map_err(|e| {
                HookError::new(format!("Invalid replacement for {}: {}", identifier, e))
            })?;
            replacements.insert(identifier.clone(), expr);
        }
        if replacements.is_empty() {
            return Ok(());
        }

        let mut replacer = Replacer {
            replacements,
            replaced: 0,
        };
        module.visit_mut_with(&mut replacer);
        tracing::trace!(path = %path.display(), count = replacer.replaced, "identifiers replaced");
        Ok(())
    }
}
