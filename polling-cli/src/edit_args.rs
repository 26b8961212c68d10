use std::str::FromStr;

use polling_app::application::PollEdit;

/// `--rename INDEX=TITLE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRename {
    pub index: usize,
    pub title: String,
}

impl FromStr for OptionRename {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (index, title) = raw
            .split_once('=')
            .ok_or_else(|| format!("expected INDEX=TITLE, got {raw:?}"))?;
        let index = index
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("option index must be a number, got {index:?}"))?;
        Ok(Self {
            index,
            title: title.to_string(),
        })
    }
}

/// Applies form changes to the working copy. Indexes refer to the option
/// order as loaded, before anything is removed or added.
pub fn apply_changes(
    edit: &mut PollEdit,
    title: Option<String>,
    renames: &[OptionRename],
    removals: &[usize],
    additions: &[String],
) -> Result<(), String> {
    if let Some(title) = title {
        edit.title = title;
    }

    for rename in renames {
        if !edit.set_option_title(rename.index, rename.title.clone()) {
            return Err(format!("no option at position {}", rename.index));
        }
    }

    let mut removals = removals.to_vec();
    removals.sort_unstable();
    removals.dedup();
    for &index in removals.iter().rev() {
        if edit.remove_option(index).is_none() {
            return Err(format!("no option at position {index}"));
        }
    }

    for title in additions {
        edit.add_option(title.clone());
    }
    Ok(())
}
