use crate::engine::FactCheckerHandle;
use crate::sync::RecordSource;
use crate::vectordb::VectorIndex;

pub struct HandlerState<I: VectorIndex + 'static, S: RecordSource + 'static> {
    pub checker: FactCheckerHandle<I, S>,
}

impl<I, S> HandlerState<I, S>
where
    I: VectorIndex + 'static,
    S: RecordSource + 'static,
{
    pub fn new(checker: FactCheckerHandle<I, S>) -> Self {
        Self { checker }
    }
}

impl<I, S> Clone for HandlerState<I, S>
where
    I: VectorIndex + 'static,
    S: RecordSource + 'static,
{
    fn clone(&self) -> Self {
        Self {
            checker: self.checker.clone(),
        }
    }
}
