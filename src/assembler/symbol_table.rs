//! Symbol table management for labels

use crate::assembler::Symbol;

/// Symbol table for managing label definitions
///
/// Labels are case-sensitive and unique. Insertion order is preserved so
/// listings show labels in source order.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    /// Create a new empty symbol table
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
        }
    }

    /// Add a symbol to the table
    ///
    /// Returns Ok(()) on success, Err with the existing symbol if the name is
    /// already defined. The table is unchanged on error.
    pub fn add_symbol(&mut self, name: &str, address: u16, defined_at: usize) -> Result<(), Symbol> {
        if let Some(existing) = self.lookup_symbol(name) {
            return Err(existing.clone());
        }

        self.symbols.push(Symbol {
            name: name.to_string(),
            address,
            defined_at,
        });

        Ok(())
    }

    /// Look up a symbol by name
    pub fn lookup_symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.name == name)
    }

    /// Address of `name`, if defined
    pub fn address_of(&self, name: &str) -> Option<u16> {
        self.lookup_symbol(name).map(|s| s.address)
    }

    /// Get all symbols
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Number of defined labels
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if no labels are defined
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Remove every symbol
    pub fn clear(&mut self) {
        self.symbols.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_table_add_lookup() {
        let mut table = SymbolTable::new();

        assert!(table.add_symbol("start", 0x0600, 1).is_ok());
        assert!(table.add_symbol("loop", 0x0610, 5).is_ok());

        let start = table.lookup_symbol("start").unwrap();
        assert_eq!(start.name, "start");
        assert_eq!(start.address, 0x0600);

        assert_eq!(table.address_of("loop"), Some(0x0610));
        assert!(table.lookup_symbol("undefined").is_none());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_symbol_table_duplicate() {
        let mut table = SymbolTable::new();

        assert!(table.add_symbol("start", 0x0600, 1).is_ok());
        let existing = table.add_symbol("start", 0x0700, 10).unwrap_err();
        assert_eq!(existing.defined_at, 1);

        // First definition should still be there
        assert_eq!(table.address_of("start"), Some(0x0600));
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        let mut table = SymbolTable::new();
        table.add_symbol("Loop", 0x0600, 1).unwrap();
        assert!(table.add_symbol("loop", 0x0602, 2).is_ok());
        assert_eq!(table.address_of("LOOP"), None);
    }
}
