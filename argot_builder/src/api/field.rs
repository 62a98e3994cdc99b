use std::cell::Cell;
use std::rc::Rc;

use crate::api::value::{scan_bool, Coercion, CoercionError};
use crate::model::FieldSpec;

// We need a (dyn .. [ignoring T] ..) here so that fields of varying types T live under one collection.
pub(crate) trait AnonymousSlot {
    fn set(&mut self, token: &str) -> Result<(), CoercionError>;

    fn render(&self) -> String;

    fn is_boolean(&self) -> bool;
}

/// A slot holding a single value; every set replaces (or updates in place) that value.
pub(crate) struct Scalar<'b, T> {
    variable: &'b mut T,
    coercion: Coercion<T>,
}

impl<'b, T> Scalar<'b, T> {
    pub(crate) fn new(variable: &'b mut T, coercion: Coercion<T>) -> Self {
        Self { variable, coercion }
    }
}

impl<'b, T: 'static> AnonymousSlot for Scalar<'b, T> {
    fn set(&mut self, token: &str) -> Result<(), CoercionError> {
        self.coercion.assign(&mut *self.variable, token)
    }

    fn render(&self) -> String {
        self.coercion.render(&*self.variable)
    }

    fn is_boolean(&self) -> bool {
        self.coercion.is_boolean()
    }
}

/// A slot holding a sequence; every set appends one fresh element.
pub(crate) struct Append<'b, T> {
    variable: &'b mut Vec<T>,
    coercion: Coercion<T>,
}

impl<'b, T> Append<'b, T> {
    pub(crate) fn new(variable: &'b mut Vec<T>, coercion: Coercion<T>) -> Self {
        Self { variable, coercion }
    }
}

impl<'b, T: 'static> AnonymousSlot for Append<'b, T> {
    fn set(&mut self, token: &str) -> Result<(), CoercionError> {
        let value = self.coercion.fresh(token)?;
        self.variable.push(value);
        Ok(())
    }

    fn render(&self) -> String {
        self.variable
            .iter()
            .map(|value| self.coercion.render(value))
            .collect::<Vec<String>>()
            .join(",")
    }

    fn is_boolean(&self) -> bool {
        false
    }
}

/// A boolean slot owned by the parser, rather than by a config record.
pub(crate) struct Switch {
    variable: Rc<Cell<bool>>,
}

impl Switch {
    pub(crate) fn new(variable: Rc<Cell<bool>>) -> Self {
        Self { variable }
    }
}

impl AnonymousSlot for Switch {
    fn set(&mut self, token: &str) -> Result<(), CoercionError> {
        let value = scan_bool(token).map_err(|source| CoercionError::Invalid {
            token: token.to_string(),
            type_name: "bool",
            source,
        })?;
        self.variable.set(value);
        Ok(())
    }

    fn render(&self) -> String {
        self.variable.get().to_string()
    }

    fn is_boolean(&self) -> bool {
        true
    }
}

/// A bound field: display metadata, plus the live slot for one parse.
pub(crate) struct BoundField<'b> {
    pub(crate) spec: FieldSpec,
    slot: Box<dyn AnonymousSlot + 'b>,
    set_count: usize,
}

impl<'b> BoundField<'b> {
    pub(crate) fn new(spec: FieldSpec, slot: Box<dyn AnonymousSlot + 'b>) -> Self {
        Self {
            spec,
            slot,
            set_count: 0,
        }
    }

    /// Counts only successful sets.
    pub(crate) fn set(&mut self, token: &str) -> Result<(), CoercionError> {
        self.slot.set(token)?;
        self.set_count += 1;
        Ok(())
    }

    pub(crate) fn set_count(&self) -> usize {
        self.set_count
    }

    pub(crate) fn is_boolean(&self) -> bool {
        self.spec.boolean
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::value::Value;

    #[test]
    fn scalar_replaces() {
        // Setup
        let mut variable: u32 = 1;
        let mut slot = Scalar::new(&mut variable, u32::coercion().unwrap());

        // Execute
        slot.set("2").unwrap();
        slot.set("3").unwrap();

        // Verify
        assert_eq!(slot.render(), "3");
        assert_eq!(variable, 3);
    }

    #[test]
    fn append_accumulates() {
        // Setup
        let mut variable: Vec<String> = vec!["a".to_string()];
        let mut slot = Append::new(&mut variable, String::coercion().unwrap());

        // Execute
        slot.set("b").unwrap();
        slot.set("c").unwrap();

        // Verify
        assert_eq!(slot.render(), "a,b,c");
        assert!(!slot.is_boolean());
        assert_eq!(variable, vec!["a", "b", "c"]);
    }

    #[test]
    fn append_failure_leaves_sequence() {
        let mut variable: Vec<u8> = vec![1];
        let mut slot = Append::new(&mut variable, u8::coercion().unwrap());
        assert_matches!(slot.set("x"), Err(CoercionError::Invalid { .. }));
        assert_eq!(variable, vec![1]);
    }

    #[test]
    fn switch_shared() {
        let variable = Rc::new(Cell::new(false));
        let mut slot = Switch::new(variable.clone());
        slot.set("true").unwrap();
        assert!(variable.get());
        slot.set("0").unwrap();
        assert!(!variable.get());
        assert_matches!(slot.set("maybe"), Err(CoercionError::Invalid { .. }));
    }

    #[test]
    fn bound_field_counts_success() {
        // Setup
        let mut variable: i8 = 0;
        let spec = FieldSpec {
            name: "level".to_string(),
            short: None,
            help: String::default(),
            placeholder: String::default(),
            required: false,
            env: None,
            multiple: false,
            hidden: false,
            boolean: false,
            default: "0".to_string(),
        };
        let mut field = BoundField::new(
            spec,
            Box::new(Scalar::new(&mut variable, i8::coercion().unwrap())),
        );

        // Execute
        let failed = field.set("x");
        field.set("4").unwrap();

        // Verify
        assert_matches!(failed, Err(_));
        assert_eq!(field.set_count(), 1);
        drop(field);
        assert_eq!(variable, 4);
    }
}
