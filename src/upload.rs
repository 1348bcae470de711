use carmin::CarminClient;
use color_eyre::eyre::{bail, Result};
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

/// Upload local files and directories under a directory on VIP.
///
/// Directories are uploaded with their structure, i.e. `data/a/b.nii`
/// uploaded to `/vip/Home` becomes `/vip/Home/data/a/b.nii`.
pub fn upload(client: &CarminClient, files: &[PathBuf], remote_dir: &str) -> Result<()> {
    let plan = upload_plan(files, remote_dir)?;
    for dir in remote_dirs(&plan, remote_dir) {
        if !client.exists(&dir)? && !client.create_dir(&dir)? {
            bail!("Could not create directory {}", dir);
        }
    }
    let mut failed = 0;
    for (file, remote) in &plan {
        if client.upload(file, remote)? {
            println!("{} -> {}", file.display(), remote);
        } else {
            eprintln!("failed: {} -> {}", file.display(), remote);
            failed += 1;
        }
    }
    if failed > 0 {
        bail!("{} of {} files were not uploaded", failed, plan.len());
    }
    Ok(())
}

/// Pair every local file with its destination on VIP.
fn upload_plan(files: &[PathBuf], remote_dir: &str) -> Result<Vec<(PathBuf, String)>> {
    let prefix = remote_dir.trim_end_matches('/');
    let mut plan = Vec::new();
    for given in files {
        let root = given.parent().unwrap_or_else(|| Path::new(""));
        for file in files_under(given)? {
            let rel = file.strip_prefix(root).unwrap_or(&file);
            let remote = std::iter::once(prefix.to_string())
                .chain(normal_components(rel))
                .collect::<Vec<_>>()
                .join("/");
            plan.push((file, remote));
        }
    }
    Ok(plan)
}

/// Remote directories which must exist before the files of `plan` are
/// uploaded, parents first.
fn remote_dirs(plan: &[(PathBuf, String)], remote_dir: &str) -> BTreeSet<String> {
    let prefix = remote_dir.trim_end_matches('/');
    let mut dirs = BTreeSet::new();
    for (_, remote) in plan {
        let mut dir = remote.as_str();
        while let Some((parent, _)) = dir.rsplit_once('/') {
            if parent.len() <= prefix.len() {
                break;
            }
            dirs.insert(parent.to_string());
            dir = parent;
        }
    }
    dirs
}

fn normal_components(path: &Path) -> impl Iterator<Item = String> + '_ {
    path.components().filter_map(|c| match c {
        Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
        _ => None,
    })
}

/// Get all files under a path, whether the given path is a file or directory.
fn files_under(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        bail!(format!("File not found: {:?}", path));
    }

    let mut sub_files: Vec<PathBuf> = Vec::new();
    for entry in fs_err::read_dir(path)? {
        let sub_path = entry?.path();
        if sub_path.is_file() {
            sub_files.push(sub_path)
        } else if sub_path.is_dir() {
            let mut nested_files = files_under(&sub_path)?;
            sub_files.append(&mut nested_files);
        }
    }
    sub_files.sort();
    Ok(sub_files)
}
