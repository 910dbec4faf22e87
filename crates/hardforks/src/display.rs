use crate::{ChainHardforks, ForkCondition};

/// A container to pretty-print a hardfork.
///
/// The fork is formatted depending on its fork condition:
///
/// - Block and timestamp based forks are formatted in the same manner (`{name} @{condition}`)
/// - TTD based forks are formatted separately as `{name} @{ttd} (network is <not> known to be
///   merged)`
#[derive(Debug)]
struct DisplayFork {
    /// The name of the hardfork (e.g. Frontier)
    name: &'static str,
    /// The fork condition
    activated_at: ForkCondition,
}

impl core::fmt::Display for DisplayFork {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.activated_at {
            ForkCondition::Block(at) | ForkCondition::Timestamp(at) => {
                write!(f, "{:32} @{at}", self.name)?;
            }
            ForkCondition::TTD { fork_block, total_difficulty } => {
                write!(
                    f,
                    "{:32} @{} ({})",
                    self.name,
                    total_difficulty,
                    if fork_block.is_some() {
                        "network is known to be merged"
                    } else {
                        "network is not known to be merged"
                    }
                )?;
            }
            ForkCondition::Never => unreachable!(),
        }

        Ok(())
    }
}

/// A container for pretty-printing a list of hardforks.
///
/// An example of the output:
///
/// ```text
/// Pre-merge hard forks (block based):
/// - Frontier                         @0
/// - Homestead                        @1150000
/// ...
/// Merge hard forks:
/// - Paris                            @58750000000000000000000 (network is known to be merged)
/// Post-merge hard forks (timestamp based):
/// - Shanghai                         @1681338455
/// - Cancun                           @1710338135
/// ```
#[derive(Debug)]
pub struct DisplayHardforks {
    /// A list of pre-merge (block based) hardforks
    pre_merge: Vec<DisplayFork>,
    /// A list of merge (TTD based) hardforks
    with_merge: Vec<DisplayFork>,
    /// A list of post-merge (timestamp based) hardforks
    post_merge: Vec<DisplayFork>,
}

impl DisplayHardforks {
    /// Creates a new [`DisplayHardforks`] from a list of hardforks.
    pub fn new(hardforks: &ChainHardforks) -> Self {
        let mut pre_merge = Vec::new();
        let mut with_merge = Vec::new();
        let mut post_merge = Vec::new();

        for (fork, condition) in hardforks.forks_iter() {
            let display_fork = DisplayFork { name: fork.name(), activated_at: condition };

            match condition {
                ForkCondition::Block(_) => pre_merge.push(display_fork),
                ForkCondition::TTD { .. } => with_merge.push(display_fork),
                ForkCondition::Timestamp(_) => post_merge.push(display_fork),
                ForkCondition::Never => continue,
            }
        }

        Self { pre_merge, with_merge, post_merge }
    }
}

impl core::fmt::Display for DisplayHardforks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        fn format(
            header: &str,
            forks: &[DisplayFork],
            next_is_empty: bool,
            f: &mut core::fmt::Formatter<'_>,
        ) -> core::fmt::Result {
            writeln!(f, "{header}:")?;
            let mut iter = forks.iter().peekable();
            while let Some(fork) = iter.next() {
                write!(f, "- {fork}")?;
                if !next_is_empty || iter.peek().is_some() {
                    writeln!(f)?;
                }
            }
            Ok(())
        }

        format(
            "Pre-merge hard forks (block based)",
            &self.pre_merge,
            self.with_merge.is_empty() && self.post_merge.is_empty(),
            f,
        )?;

        if !self.with_merge.is_empty() {
            format("Merge hard forks", &self.with_merge, self.post_merge.is_empty(), f)?;
        }

        if !self.post_merge.is_empty() {
            format("Post-merge hard forks (timestamp based)", &self.post_merge, true, f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::ChainHardforks;

    #[test]
    fn mainnet_display() {
        let rendered = ChainHardforks::mainnet().display().to_string();
        assert!(rendered.starts_with("Pre-merge hard forks (block based):\n- Frontier"));
        assert!(rendered.contains("Merge hard forks:\n- Paris"));
        assert!(rendered.contains("network is known to be merged"));
        assert!(rendered.contains("Post-merge hard forks (timestamp based):\n- Shanghai"));
    }
}
