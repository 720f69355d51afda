/// Text rows of one tabular document, as read from a spreadsheet or CSV.
pub type Rows = Vec<Vec<String>>;

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("load error: {0}")]
    Load(String),
    #[error("PDU section '{0}' not found in template")]
    SectionNotFound(String),
    #[error("row index {row} exceeds template size ({len} rows)")]
    Range { row: usize, len: usize },
    #[error("export error: {0}")]
    Export(String),
    #[error("config error: {0}")]
    Config(String),
}

pub trait Source<T> {
    fn load(&self) -> Result<T, PipelineError>;
}

pub trait Transform<I, O> {
    fn apply(&self, input: I) -> Result<O, PipelineError>;
}

pub trait Sink<T> {
    fn write(&self, item: &T) -> Result<(), PipelineError>;
}

impl<T, S: Source<T> + ?Sized> Source<T> for Box<S> {
    fn load(&self) -> Result<T, PipelineError> {
        (**self).load()
    }
}

/// An absent sink accepts everything and writes nothing.
impl<T, K: Sink<T>> Sink<T> for Option<K> {
    fn write(&self, item: &T) -> Result<(), PipelineError> {
        match self {
            Some(sink) => sink.write(item),
            None => Ok(()),
        }
    }
}

impl<T, K: Sink<T> + ?Sized> Sink<T> for &K {
    fn write(&self, item: &T) -> Result<(), PipelineError> {
        (**self).write(item)
    }
}

/// One load -> transform -> save pass.
///
/// Nothing reaches the sink unless both the load and the transform succeed,
/// so a failed run never leaves partial output behind.
pub struct Pipeline<S, X, K> {
    pub source: S,
    pub transform: X,
    pub sink: K,
}

impl<S, X, K> Pipeline<S, X, K> {
    pub fn run<I, O>(self) -> Result<O, PipelineError>
    where
        S: Source<I>,
        X: Transform<I, O>,
        K: Sink<O>,
    {
        let input = self.source.load()?;
        let output = self.transform.apply(input)?;
        self.sink.write(&output)?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Fixed(Vec<i64>);

    impl Source<Vec<i64>> for Fixed {
        fn load(&self) -> Result<Vec<i64>, PipelineError> {
            Ok(self.0.clone())
        }
    }

    struct Sum;

    impl Transform<Vec<i64>, i64> for Sum {
        fn apply(&self, input: Vec<i64>) -> Result<i64, PipelineError> {
            if input.is_empty() {
                return Err(PipelineError::Load("nothing to sum".to_string()));
            }
            Ok(input.iter().sum())
        }
    }

    #[derive(Default)]
    struct Recorder(RefCell<Vec<i64>>);

    impl Sink<i64> for Recorder {
        fn write(&self, item: &i64) -> Result<(), PipelineError> {
            self.0.borrow_mut().push(*item);
            Ok(())
        }
    }

    #[test]
    fn pipeline_writes_transformed_output() {
        let recorder = Recorder::default();
        let out = Pipeline {
            source: Fixed(vec![1, 2, 3]),
            transform: Sum,
            sink: &recorder,
        }
        .run()
        .unwrap();
        assert_eq!(out, 6);
        assert_eq!(*recorder.0.borrow(), vec![6]);
    }

    #[test]
    fn failed_transform_never_reaches_sink() {
        let recorder = Recorder::default();
        let res = Pipeline {
            source: Fixed(vec![]),
            transform: Sum,
            sink: &recorder,
        }
        .run();
        assert!(matches!(res, Err(PipelineError::Load(_))));
        assert!(recorder.0.borrow().is_empty());
    }

    #[test]
    fn missing_sink_is_a_no_op() {
        let out = Pipeline {
            source: Fixed(vec![4]),
            transform: Sum,
            sink: None::<Recorder>,
        }
        .run()
        .unwrap();
        assert_eq!(out, 4);
    }
}
