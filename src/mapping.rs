//! Mapping between output neurons and digit classes.
//!
//! A full network has one output neuron per digit. A specialist network only
//! recognises a subset of digits and carries an extra abstain neuron that
//! fires for everything outside its competence; every digit it does not cover
//! is trained toward that neuron.

use thiserror::Error;

/// Number of digit classes (0-9).
pub const CLASS_COUNT: usize = 10;

/// What a single output neuron stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeuronClass {
    Class(u8),
    Abstain,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("mapping has no output neurons")]
    Empty,
    #[error("class {0} is outside 0..{CLASS_COUNT}")]
    ClassOutOfRange(u8),
    #[error("class {0} is assigned to more than one neuron")]
    DuplicateClass(u8),
    #[error("class {class} maps to neuron {neuron}, which does not exist")]
    MissingNeuron { class: u8, neuron: usize },
    #[error("class {class} maps to neuron {neuron}, which stands for {found:?}")]
    NotInverse {
        class: u8,
        neuron: usize,
        found: NeuronClass,
    },
}

/// Validated pair of `neuron → class` and `class → neuron` tables.
///
/// Invariants:
/// - every class in 0..10 maps to a neuron;
/// - a class covered by a `Class` neuron maps back to exactly that neuron;
/// - a class not covered by any neuron maps to an `Abstain` neuron.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMapping {
    neuron_to_class: Vec<NeuronClass>,
    class_to_neuron: [usize; CLASS_COUNT],
}

impl ClassMapping {
    pub fn new(
        neuron_to_class: Vec<NeuronClass>,
        class_to_neuron: [usize; CLASS_COUNT],
    ) -> Result<Self, MappingError> {
        if neuron_to_class.is_empty() {
            return Err(MappingError::Empty);
        }

        let mut covered = [false; CLASS_COUNT];
        for entry in &neuron_to_class {
            if let NeuronClass::Class(class) = *entry {
                let slot = covered
                    .get_mut(class as usize)
                    .ok_or(MappingError::ClassOutOfRange(class))?;
                if *slot {
                    return Err(MappingError::DuplicateClass(class));
                }
                *slot = true;
            }
        }

        for (class, &neuron) in class_to_neuron.iter().enumerate() {
            let class = class as u8;
            let found = *neuron_to_class
                .get(neuron)
                .ok_or(MappingError::MissingNeuron { class, neuron })?;
            let consistent = match found {
                NeuronClass::Class(target) => target == class,
                NeuronClass::Abstain => !covered[class as usize],
            };
            if !consistent {
                return Err(MappingError::NotInverse {
                    class,
                    neuron,
                    found,
                });
            }
        }

        Ok(Self {
            neuron_to_class,
            class_to_neuron,
        })
    }

    /// One neuron per digit, neuron `i` standing for digit `i`.
    pub fn identity() -> Self {
        let mut class_to_neuron = [0; CLASS_COUNT];
        for (class, slot) in class_to_neuron.iter_mut().enumerate() {
            *slot = class;
        }
        Self {
            neuron_to_class: (0..CLASS_COUNT as u8).map(NeuronClass::Class).collect(),
            class_to_neuron,
        }
    }

    /// One neuron per listed class followed by a single abstain neuron.
    ///
    /// ```
    /// use digit_ensemble::mapping::{ClassMapping, NeuronClass};
    ///
    /// let mapping = ClassMapping::specialist(&[0, 1, 3, 6, 9]).unwrap();
    /// assert_eq!(mapping.neuron_count(), 6);
    /// assert_eq!(mapping.neuron_for(3), 2);
    /// assert_eq!(mapping.neuron_for(2), 5);
    /// assert_eq!(mapping.class_of(5), NeuronClass::Abstain);
    /// ```
    pub fn specialist(classes: &[u8]) -> Result<Self, MappingError> {
        let abstain = classes.len();
        let mut class_to_neuron = [abstain; CLASS_COUNT];
        for (neuron, &class) in classes.iter().enumerate() {
            if class as usize >= CLASS_COUNT {
                return Err(MappingError::ClassOutOfRange(class));
            }
            class_to_neuron[class as usize] = neuron;
        }

        let mut neuron_to_class: Vec<NeuronClass> =
            classes.iter().copied().map(NeuronClass::Class).collect();
        neuron_to_class.push(NeuronClass::Abstain);

        Self::new(neuron_to_class, class_to_neuron)
    }

    pub fn neuron_count(&self) -> usize {
        self.neuron_to_class.len()
    }

    pub fn class_of(&self, neuron: usize) -> NeuronClass {
        self.neuron_to_class[neuron]
    }

    /// Output neuron a sample of `class` is trained toward.
    ///
    /// # Panics
    ///
    /// Panics if `class` is not a digit.
    pub fn neuron_for(&self, class: u8) -> usize {
        self.class_to_neuron[class as usize]
    }

    /// Whether some neuron stands for `class` itself.
    pub fn covers(&self, class: u8) -> bool {
        (class as usize) < CLASS_COUNT
            && self.neuron_to_class[self.class_to_neuron[class as usize]]
                == NeuronClass::Class(class)
    }

    /// First abstain neuron, if the network has one.
    pub fn abstain_neuron(&self) -> Option<usize> {
        self.neuron_to_class
            .iter()
            .position(|entry| *entry == NeuronClass::Abstain)
    }

    pub fn neurons(&self) -> &[NeuronClass] {
        &self.neuron_to_class
    }
}

impl Default for ClassMapping {
    fn default() -> Self {
        Self::identity()
    }
}
