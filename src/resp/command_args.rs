use crate::resp::CommandArg;
use smallvec::SmallVec;

/// Collection of [`CommandArg`]s attached to a [`Command`](crate::resp::Command).
///
/// Optimized for the common case of a handful of arguments: up to five are stored inline,
/// anything beyond that spills into a `SmallVec`.
#[derive(Debug, Clone)]
pub enum CommandArgs {
    Empty,
    Single(CommandArg),
    Array2([CommandArg; 2]),
    Array3([CommandArg; 3]),
    Array4([CommandArg; 4]),
    Array5([CommandArg; 5]),
    Vec(SmallVec<[CommandArg; 10]>),
}

impl Default for CommandArgs {
    fn default() -> Self {
        CommandArgs::Empty
    }
}

impl CommandArgs {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            CommandArgs::Empty => 0,
            CommandArgs::Single(_) => 1,
            CommandArgs::Array2(_) => 2,
            CommandArgs::Array3(_) => 3,
            CommandArgs::Array4(_) => 4,
            CommandArgs::Array5(_) => 5,
            CommandArgs::Vec(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CommandArg> {
        match self {
            CommandArgs::Empty => [].iter(),
            CommandArgs::Single(a) => std::slice::from_ref(a).iter(),
            CommandArgs::Array2(a) => a.iter(),
            CommandArgs::Array3(a) => a.iter(),
            CommandArgs::Array4(a) => a.iter(),
            CommandArgs::Array5(a) => a.iter(),
            CommandArgs::Vec(v) => v.iter(),
        }
    }
}

pub struct CommandArgsIntoIter {
    inner: std::vec::IntoIter<CommandArg>,
}

impl Iterator for CommandArgsIntoIter {
    type Item = CommandArg;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl IntoIterator for CommandArgs {
    type Item = CommandArg;
    type IntoIter = CommandArgsIntoIter;

    fn into_iter(self) -> Self::IntoIter {
        let vec: Vec<CommandArg> = match self {
            CommandArgs::Empty => Vec::new(),
            CommandArgs::Single(a) => vec![a],
            CommandArgs::Array2(a) => a.into(),
            CommandArgs::Array3(a) => a.into(),
            CommandArgs::Array4(a) => a.into(),
            CommandArgs::Array5(a) => a.into(),
            CommandArgs::Vec(v) => v.into_vec(),
        };

        CommandArgsIntoIter {
            inner: vec.into_iter(),
        }
    }
}

impl<'a> IntoIterator for &'a CommandArgs {
    type Item = &'a CommandArg;
    type IntoIter = std::slice::Iter<'a, CommandArg>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
