//! Local learners: one client's private data plus its view of the centers.

use crate::cluster::{FcmConfig, FitSummary, FuzzyCMeans, Initialization};
use crate::error::{Error, Result};
use ndarray::{Array1, Array2, ArrayView2, Axis};

/// What a federation participant exposes to the validator and aggregator.
pub trait LocalLearner {
    /// The client's private data (`N_local × D`).
    fn client_data(&self) -> ArrayView2<'_, f64>;

    /// Centers (`K × D`), `None` before any have been received or fitted.
    fn centers(&self) -> Option<ArrayView2<'_, f64>>;

    /// Per-cluster total membership over the client's points.
    fn center_support(&self) -> Option<Array1<f64>>;
}

impl<T: LocalLearner + ?Sized> LocalLearner for &T {
    fn client_data(&self) -> ArrayView2<'_, f64> {
        (**self).client_data()
    }

    fn centers(&self) -> Option<ArrayView2<'_, f64>> {
        (**self).centers()
    }

    fn center_support(&self) -> Option<Array1<f64>> {
        (**self).center_support()
    }
}

/// A client holding a private data slice and a local [`FuzzyCMeans`].
#[derive(Debug, Clone)]
pub struct ClientLearner {
    data: Array2<f64>,
    model: FuzzyCMeans,
    membership: Option<Array2<f64>>,
}

impl ClientLearner {
    /// Wrap `data` with an optimizer built from `config`.
    pub fn new(data: Array2<f64>, config: FcmConfig) -> Result<Self> {
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(Error::EmptyInput);
        }
        Ok(Self {
            data,
            model: FuzzyCMeans::new(config)?,
            membership: None,
        })
    }

    /// The local optimizer.
    pub fn model(&self) -> &FuzzyCMeans {
        &self.model
    }

    /// Membership of the local points under the current centers.
    pub fn membership(&self) -> Option<&Array2<f64>> {
        self.membership.as_ref()
    }

    /// Adopt shared centers and recompute local membership, without iterating.
    pub fn receive_centers(&mut self, centers: Array2<f64>) -> Result<()> {
        let mut model = self.model.clone();
        model.set_centers(centers)?;
        let membership = model.predict(self.data.view())?;
        self.model = model;
        self.membership = Some(membership);
        Ok(())
    }

    /// Refine the received centers on local data.
    pub fn fit_local(&mut self) -> Result<FitSummary> {
        let summary = self.model.fit(self.data.view(), Initialization::Federated)?;
        self.membership = self.model.membership().cloned();
        Ok(summary)
    }
}

impl LocalLearner for ClientLearner {
    fn client_data(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    fn centers(&self) -> Option<ArrayView2<'_, f64>> {
        self.model.centers().map(|c| c.view())
    }

    fn center_support(&self) -> Option<Array1<f64>> {
        self.membership.as_ref().map(|u| u.sum_axis(Axis(0)))
    }
}
