use crate::ast::VarType;

/// Identifier -> declared type, in declaration order. Built while the
/// parser consumes the declarations block, frozen afterwards and shared
/// read-only by the analyzer and the interpreter.
///
/// Re-declaring a name is not rejected here: the later declaration
/// overwrites the recorded type in place (the duplicate is reported by
/// the semantic analyzer, not the parser).
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: Vec<(String, VarType)>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: &str, declared_type: VarType) {
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| n == name) {
            entry.1 = declared_type;
        } else {
            self.entries.push((name.to_string(), declared_type));
        }
    }

    pub fn get(&self, name: &str) -> Option<VarType> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| *t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, VarType)> {
        self.entries.iter().map(|(n, t)| (n.as_str(), *t))
    }
}
