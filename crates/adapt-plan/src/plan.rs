use crate::config::PlanConfig;
use crate::render::{keyring_path, list_file_path, pin_contents, pin_file_path, source_line};
use adapt_aptfile::{Directive, PackageDirective};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One package-manager operation implied by an Aptfile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Action {
    /// `add-apt-repository --yes ppa:<name>`
    AddPpa { name: String },
    /// Download an ASCII-armored key and store it dearmored at `keyring`.
    FetchKey { url: String, keyring: PathBuf },
    /// Write `source_line` to `list_file`.
    AddRepo {
        list_file: PathBuf,
        source_line: String,
    },
    /// `dpkg -i <source>`, downloading it first when it is a URL.
    InstallDeb { source: String, download: bool },
    /// Write an apt_preferences(5) stanza.
    WritePin { file: PathBuf, contents: String },
    /// `apt-mark hold <package>`
    Hold { package: String },
    /// `apt-get update`
    UpdateLists,
    /// `apt-get install --no-install-recommends <specs...>`
    InstallPackages { specs: Vec<String> },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddPpa { name } => write!(f, "add PPA: ppa:{name}"),
            Self::FetchKey { url, keyring } => {
                write!(f, "download signing key {url} to {}", keyring.display())
            }
            Self::AddRepo {
                list_file,
                source_line,
            } => write!(
                f,
                "add repository to {}: {source_line}",
                list_file.display()
            ),
            Self::InstallDeb {
                source,
                download: true,
            } => write!(f, "download and install .deb: {source}"),
            Self::InstallDeb { source, .. } => write!(f, "install .deb: {source}"),
            Self::WritePin { file, .. } => write!(f, "write pin file {}", file.display()),
            Self::Hold { package } => write!(f, "hold package: {package}"),
            Self::UpdateLists => f.write_str("update package lists"),
            Self::InstallPackages { specs } => {
                write!(f, "install packages: {}", specs.join(", "))
            }
        }
    }
}

/// The ordered actions for an Aptfile.
///
/// Repositories, PPAs, keys, `.deb` files, pins and holds come first, in file
/// order, so that packages can be installed from them afterwards in a single
/// `apt-get install` preceded by a list update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub actions: Vec<Action>,
}

impl Plan {
    pub fn from_directives(directives: &[Directive], config: &PlanConfig) -> Self {
        let mut actions = Vec::with_capacity(directives.len() + 2);
        let mut packages: Vec<&PackageDirective> = Vec::new();

        for directive in directives {
            match directive {
                Directive::Package(pkg) => packages.push(pkg),
                Directive::Ppa(ppa) => actions.push(Action::AddPpa {
                    name: ppa.name.clone(),
                }),
                Directive::Repo(repo) => {
                    let keyring = if let Some(url) = &repo.signed_by {
                        let keyring = keyring_path(config, repo);
                        actions.push(Action::FetchKey {
                            url: url.clone(),
                            keyring: keyring.clone(),
                        });
                        Some(keyring)
                    } else {
                        None
                    };
                    actions.push(Action::AddRepo {
                        list_file: list_file_path(config, repo),
                        source_line: source_line(repo, keyring.as_deref()),
                    });
                }
                Directive::Deb(deb) => actions.push(Action::InstallDeb {
                    source: deb.path.clone(),
                    download: is_remote(&deb.path),
                }),
                Directive::Pin(pin) => actions.push(Action::WritePin {
                    file: pin_file_path(config, pin),
                    contents: pin_contents(pin),
                }),
                Directive::Hold(hold) => actions.push(Action::Hold {
                    package: hold.package_name.clone(),
                }),
            }
        }

        if !packages.is_empty() {
            actions.push(Action::UpdateLists);
            actions.push(Action::InstallPackages {
                specs: packages.iter().map(ToString::to_string).collect(),
            });
        }

        tracing::debug!(
            "planned {} action(s) from {} directive(s)",
            actions.len(),
            directives.len()
        );
        Self { actions }
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }
}

fn is_remote(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}
