use data_transfer_objects::{ColumnBindings, ColumnSpec, DomainKind, Signal};

/// The columns a fault condition reads, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ColumnSpecRegistry {
    specs: Vec<ColumnSpec>,
}

impl ColumnSpecRegistry {
    pub fn new() -> ColumnSpecRegistry {
        ColumnSpecRegistry { specs: Vec::new() }
    }

    /// Binds `signal` to its configured column. Re-registering a signal
    /// replaces the earlier spec in place.
    pub fn register(&mut self, bindings: &ColumnBindings, signal: Signal, kind: DomainKind) {
        let spec = ColumnSpec {
            signal,
            column: bindings.column_for(signal).to_string(),
            kind,
        };
        match self.specs.iter_mut().find(|known| known.signal == signal) {
            Some(known) => *known = spec,
            None => self.specs.push(spec),
        }
    }

    pub fn with(mut self, bindings: &ColumnBindings, signal: Signal, kind: DomainKind) -> Self {
        self.register(bindings, signal, kind);
        self
    }

    pub fn spec(&self, signal: Signal) -> Option<&ColumnSpec> {
        self.specs.iter().find(|spec| spec.signal == signal)
    }

    pub fn column(&self, signal: Signal) -> Option<&str> {
        self.spec(signal).map(|spec| spec.column.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.specs.iter()
    }

    pub fn fraction_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.specs.iter().filter(|spec| spec.kind.is_fraction())
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
