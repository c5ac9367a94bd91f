use anyhow::{Context, Result};
use kube::{
    config::{KubeConfigOptions, Kubeconfig},
    Client, Config,
};
use std::path::{Path, PathBuf};

/// Where kubelet keeps its own credentials on a cluster node.
pub const KUBELET_KUBECONFIG: &str = "/etc/kubernetes/kubelet.conf";

/// The kubeconfig to use when none was given: the kubelet's, if this host has one.
pub fn default_kubeconfig() -> Option<PathBuf> {
    let path = PathBuf::from(KUBELET_KUBECONFIG);
    path.is_file().then_some(path)
}

/// Build a kube::Client.
///
/// With a path, that kubeconfig is read (optionally at `context`). Without a
/// path but with a context, the default kubeconfig ($KUBECONFIG or
/// ~/.kube/config) is used at that context. With neither, the config is
/// inferred (kubeconfig, then in-cluster service account).
pub async fn build_client(kubeconfig: Option<&Path>, context: Option<&str>) -> Result<Client> {
    let options = KubeConfigOptions {
        context: context.map(str::to_string),
        ..Default::default()
    };

    let config = match (kubeconfig, context) {
        (Some(path), _) => {
            let kc = Kubeconfig::read_from(path)
                .with_context(|| format!("Failed to read kubeconfig '{}'", path.display()))?;
            Config::from_custom_kubeconfig(kc, &options)
                .await
                .with_context(|| format!("Failed to load kubeconfig '{}'", path.display()))?
        }
        (None, Some(ctx)) => Config::from_kubeconfig(&options)
            .await
            .with_context(|| format!("Failed to load kubeconfig context '{ctx}'"))?,
        (None, None) => Config::infer()
            .await
            .context("Failed to infer Kubernetes configuration")?,
    };

    Client::try_from(config).context("Failed to build Kubernetes client")
}
