//! Heston確率的ボラティリティモデル実装
//!
//! Hestonモデルは以下のSDEで記述される確率的ボラティリティモデル:
//! ```text
//! dS = r * S * dt + sqrt(V) * S * dW_S
//! dV = kappa * (theta - V) * dt + xi * sqrt(V) * dW_V
//! E[dW_S * dW_V] = rho * dt
//! ```
//! ここで:
//! - S = 資産価格
//! - V = 瞬間分散
//! - r = リスクフリーレート
//! - kappa = 平均回帰速度
//! - theta = 長期分散
//! - xi = ボラティリティのボラティリティ (vol-of-vol)
//! - rho = 資産価格と分散の相関
//! - dW_S, dW_V = 相関ブラウン運動
//!
//! ## Feller条件
//!
//! 分散が常に正を保つための十分条件:
//! ```text
//! 2 * kappa * theta > xi^2
//! ```
//!
//! ## QE離散化スキーム
//!
//! Andersen (2008) のQuadratic Exponential離散化スキームを使用。
//! psi値に基づいて二次スキームと指数スキームを滑らかに切り替える。
//!
//! ## 使用例
//!
//! ```
//! use pricer_models::models::heston::{HestonParams, HestonError};
//!
//! // パラメータを作成
//! let params = HestonParams::new(
//!     100.0,  // スポット価格
//!     0.04,   // 初期分散
//!     0.04,   // 長期分散
//!     1.5,    // 平均回帰速度
//!     0.3,    // vol-of-vol
//!     -0.7,   // 相関
//!     0.05,   // リスクフリーレート
//!     1.0,    // 満期
//! );
//! assert!(params.is_ok());
//!
//! let p = params.unwrap();
//! assert!(p.satisfies_feller()); // Feller条件をチェック
//! ```

use pricer_core::math::smoothing::{smooth_indicator, smooth_max, smooth_sqrt};
use pricer_core::traits::priceable::Differentiable;
use pricer_core::traits::Float;
use thiserror::Error;

/// Hestonモデルエラー型
///
/// パラメータ検証と数値計算時のエラーを表現する。
/// `thiserror`クレートを使用して構造化されたエラー情報を提供。
///
/// # バリアント
///
/// - `InvalidSpot`: スポット価格が正でない
/// - `InvalidV0`: 初期分散が正でない
/// - `InvalidTheta`: 長期分散が正でない
/// - `InvalidKappa`: 平均回帰速度が正でない
/// - `InvalidXi`: vol-of-volが正でない
/// - `InvalidRho`: 相関が[-1, 1]の範囲外
/// - `InvalidMaturity`: 満期が正でない
/// - `NumericalInstability`: 数値計算の不安定性
/// - `NonFinite`: NaNまたは無限大が検出された
///
/// # 例
///
/// ```
/// use pricer_models::models::heston::HestonError;
///
/// let err = HestonError::InvalidSpot(-100.0);
/// assert!(format!("{}", err).contains("-100"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HestonError {
    /// 無効なスポット価格（正でなければならない）
    #[error("無効なスポット価格: S0 = {0} (正の値が必要)")]
    InvalidSpot(f64),

    /// 無効な初期分散（正でなければならない）
    #[error("無効な初期分散: v0 = {0} (正の値が必要)")]
    InvalidV0(f64),

    /// 無効な長期分散（正でなければならない）
    #[error("無効な長期分散: theta = {0} (正の値が必要)")]
    InvalidTheta(f64),

    /// 無効な平均回帰速度（正でなければならない）
    #[error("無効な平均回帰速度: kappa = {0} (正の値が必要)")]
    InvalidKappa(f64),

    /// 無効なvol-of-vol（正でなければならない）
    #[error("無効なvol-of-vol: xi = {0} (正の値が必要)")]
    InvalidXi(f64),

    /// 無効な相関係数（-1から1の範囲内でなければならない）
    #[error("無効な相関係数: rho = {0} ([-1, 1]の範囲が必要)")]
    InvalidRho(f64),

    /// 無効な満期（正でなければならない）
    #[error("無効な満期: T = {0} (正の値が必要)")]
    InvalidMaturity(f64),

    /// 無効なQE切り替え閾値（正でなければならない）
    #[error("無効なQE閾値: psi_c = {0} (正の値が必要)")]
    InvalidPsiC(f64),

    /// 無効なsmoothing epsilon（正でなければならない）
    #[error("無効なsmoothing epsilon: {0} (正の値が必要)")]
    InvalidEpsilon(f64),

    /// 数値的不安定性が検出された
    #[error("数値的不安定性: {0}")]
    NumericalInstability(String),

    /// NaNまたは無限大が検出された
    #[error("{0}でNaNまたはInfinityが検出されました")]
    NonFinite(String),
}

/// Hestonモデルパラメータ
///
/// # 型パラメータ
///
/// * `T` - Float型（f64またはAD互換のDualNumber）
///
/// # フィールド
///
/// * `spot` - スポット価格 (S0 > 0)
/// * `v0` - 初期分散 (v0 > 0)
/// * `theta` - 長期分散 (theta > 0)
/// * `kappa` - 平均回帰速度 (kappa > 0)
/// * `xi` - ボラティリティのボラティリティ (xi > 0)
/// * `rho` - 相関係数 (-1 <= rho <= 1)
/// * `rate` - リスクフリーレート
/// * `maturity` - 満期までの時間 (T > 0)
/// * `psi_c` - QE切り替え閾値 (推奨値: 1.5)
/// * `smoothing_epsilon` - smooth approximation用のepsilon
///
/// # 例
///
/// ```
/// use pricer_models::models::heston::HestonParams;
///
/// let params = HestonParams::new(
///     100.0, 0.04, 0.04, 1.5, 0.3, -0.7, 0.05, 1.0
/// );
/// assert!(params.is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HestonParams<T: Float> {
    /// スポット価格 (S0)
    pub spot: T,
    /// 初期分散 (v0)
    pub v0: T,
    /// 長期分散 (theta)
    pub theta: T,
    /// 平均回帰速度 (kappa)
    pub kappa: T,
    /// ボラティリティのボラティリティ (xi/sigma)
    pub xi: T,
    /// 相関係数 (rho)
    pub rho: T,
    /// リスクフリーレート
    pub rate: T,
    /// 満期までの時間
    pub maturity: T,
    /// QE切り替え閾値 (psi_c, デフォルト: 1.5)
    pub psi_c: T,
    /// smooth approximation epsilon
    pub smoothing_epsilon: T,
}

impl<T: Float> HestonParams<T> {
    /// 新しいHestonパラメータを作成（検証付き）
    ///
    /// # 引数
    ///
    /// * `spot` - スポット価格（正でなければならない）
    /// * `v0` - 初期分散（正でなければならない）
    /// * `theta` - 長期分散（正でなければならない）
    /// * `kappa` - 平均回帰速度（正でなければならない）
    /// * `xi` - vol-of-vol（正でなければならない）
    /// * `rho` - 相関係数（-1から1の範囲）
    /// * `rate` - リスクフリーレート
    /// * `maturity` - 満期（正でなければならない）
    ///
    /// # 戻り値
    ///
    /// パラメータが有効な場合は`Ok(HestonParams)`、無効な場合は`Err(HestonError)`
    ///
    /// # 例
    ///
    /// ```
    /// use pricer_models::models::heston::HestonParams;
    ///
    /// // 有効なパラメータ
    /// let params = HestonParams::new(100.0, 0.04, 0.04, 1.5, 0.3, -0.7, 0.05, 1.0);
    /// assert!(params.is_ok());
    ///
    /// // 無効なスポット価格
    /// let invalid = HestonParams::new(-100.0, 0.04, 0.04, 1.5, 0.3, -0.7, 0.05, 1.0);
    /// assert!(invalid.is_err());
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        spot: T,
        v0: T,
        theta: T,
        kappa: T,
        xi: T,
        rho: T,
        rate: T,
        maturity: T,
    ) -> Result<Self, HestonError> {
        let params = Self {
            spot,
            v0,
            theta,
            kappa,
            xi,
            rho,
            rate,
            maturity,
            psi_c: T::from(1.5).unwrap_or(T::one()),
            smoothing_epsilon: T::from(1e-8).unwrap_or(T::zero()),
        };
        params.validate()?;
        Ok(params)
    }

    /// カスタムQE閾値を設定
    ///
    /// # 引数
    ///
    /// * `psi_c` - QE切り替え閾値（正でなければならない）
    ///
    /// # 戻り値
    ///
    /// 更新されたパラメータ
    pub fn with_psi_c(mut self, psi_c: T) -> Result<Self, HestonError> {
        if psi_c <= T::zero() {
            return Err(HestonError::InvalidPsiC(
                psi_c.to_f64().unwrap_or(f64::NAN),
            ));
        }
        self.psi_c = psi_c;
        Ok(self)
    }

    /// カスタムsmoothing epsilonを設定
    ///
    /// # 引数
    ///
    /// * `epsilon` - smoothing epsilon（正でなければならない）
    ///
    /// # 戻り値
    ///
    /// 更新されたパラメータ
    pub fn with_epsilon(mut self, epsilon: T) -> Result<Self, HestonError> {
        if epsilon <= T::zero() {
            return Err(HestonError::InvalidEpsilon(
                epsilon.to_f64().unwrap_or(f64::NAN),
            ));
        }
        self.smoothing_epsilon = epsilon;
        Ok(self)
    }

    /// パラメータを検証
    ///
    /// # 戻り値
    ///
    /// パラメータが有効な場合は`Ok(())`、無効な場合は`Err(HestonError)`
    pub fn validate(&self) -> Result<(), HestonError> {
        // スポット価格は正でなければならない
        if self.spot <= T::zero() {
            return Err(HestonError::InvalidSpot(
                self.spot.to_f64().unwrap_or(f64::NAN),
            ));
        }

        // 初期分散は正でなければならない
        if self.v0 <= T::zero() {
            return Err(HestonError::InvalidV0(
                self.v0.to_f64().unwrap_or(f64::NAN),
            ));
        }

        // 長期分散は正でなければならない
        if self.theta <= T::zero() {
            return Err(HestonError::InvalidTheta(
                self.theta.to_f64().unwrap_or(f64::NAN),
            ));
        }

        // 平均回帰速度は正でなければならない
        if self.kappa <= T::zero() {
            return Err(HestonError::InvalidKappa(
                self.kappa.to_f64().unwrap_or(f64::NAN),
            ));
        }

        // vol-of-volは正でなければならない
        if self.xi <= T::zero() {
            return Err(HestonError::InvalidXi(
                self.xi.to_f64().unwrap_or(f64::NAN),
            ));
        }

        // 相関は[-1, 1]の範囲内でなければならない
        let one = T::one();
        if self.rho < -one || self.rho > one {
            return Err(HestonError::InvalidRho(
                self.rho.to_f64().unwrap_or(f64::NAN),
            ));
        }

        // 満期は正でなければならない
        if self.maturity <= T::zero() {
            return Err(HestonError::InvalidMaturity(
                self.maturity.to_f64().unwrap_or(f64::NAN),
            ));
        }

        // QE閾値は正でなければならない
        if self.psi_c <= T::zero() {
            return Err(HestonError::InvalidPsiC(
                self.psi_c.to_f64().unwrap_or(f64::NAN),
            ));
        }

        // smoothing epsilonは正でなければならない
        if self.smoothing_epsilon <= T::zero() {
            return Err(HestonError::InvalidEpsilon(
                self.smoothing_epsilon.to_f64().unwrap_or(f64::NAN),
            ));
        }

        Ok(())
    }

    /// Feller条件をチェック (2 * kappa * theta > xi^2)
    ///
    /// Feller条件が満たされる場合、分散過程は常に正を保つ。
    ///
    /// # 戻り値
    ///
    /// Feller条件が満たされる場合は`true`、そうでない場合は`false`
    ///
    /// # 例
    ///
    /// ```
    /// use pricer_models::models::heston::HestonParams;
    ///
    /// // Feller条件を満たすパラメータ: 2 * 1.5 * 0.04 = 0.12 > 0.3^2 = 0.09
    /// let params = HestonParams::new(100.0, 0.04, 0.04, 1.5, 0.3, -0.7, 0.05, 1.0).unwrap();
    /// assert!(params.satisfies_feller());
    ///
    /// // Feller条件を満たさないパラメータ: 2 * 0.5 * 0.04 = 0.04 < 0.5^2 = 0.25
    /// let params2 = HestonParams::new(100.0, 0.04, 0.04, 0.5, 0.5, -0.7, 0.05, 1.0).unwrap();
    /// assert!(!params2.satisfies_feller());
    /// ```
    pub fn satisfies_feller(&self) -> bool {
        let two = T::from(2.0).unwrap_or(T::one());
        let lhs = two * self.kappa * self.theta;
        let rhs = self.xi * self.xi;
        lhs > rhs
    }

    /// Feller比率を計算 (2 * kappa * theta / xi^2)
    ///
    /// 値が1.0以上の場合、Feller条件が満たされる。
    ///
    /// # 戻り値
    ///
    /// Feller比率
    pub fn feller_ratio(&self) -> T {
        let two = T::from(2.0).unwrap_or(T::one());
        let numerator = two * self.kappa * self.theta;
        let denominator = self.xi * self.xi;
        if denominator > T::zero() {
            numerator / denominator
        } else {
            T::infinity()
        }
    }
}

impl<T: Float> Default for HestonParams<T> {
    /// デフォルトのHestonパラメータを作成
    ///
    /// 標準的なパラメータセット:
    /// - spot = 100.0
    /// - v0 = 0.04 (20% vol)
    /// - theta = 0.04 (20% vol long-term)
    /// - kappa = 1.5
    /// - xi = 0.3
    /// - rho = -0.7
    /// - rate = 0.05 (5%)
    /// - maturity = 1.0 (1 year)
    fn default() -> Self {
        Self {
            spot: T::from(100.0).unwrap_or(T::one()),
            v0: T::from(0.04).unwrap_or(T::zero()),
            theta: T::from(0.04).unwrap_or(T::zero()),
            kappa: T::from(1.5).unwrap_or(T::one()),
            xi: T::from(0.3).unwrap_or(T::zero()),
            rho: T::from(-0.7).unwrap_or(T::zero()),
            rate: T::from(0.05).unwrap_or(T::zero()),
            maturity: T::from(1.0).unwrap_or(T::one()),
            psi_c: T::from(1.5).unwrap_or(T::one()),
            smoothing_epsilon: T::from(1e-8).unwrap_or(T::zero()),
        }
    }
}

/// Hestonモデル
///
/// 確率的ボラティリティモデルの実装。以下のSDEで記述される:
/// ```text
/// dS = r * S * dt + sqrt(V) * S * dW_S
/// dV = kappa * (theta - V) * dt + xi * sqrt(V) * dW_V
/// E[dW_S * dW_V] = rho * dt
/// ```
///
/// # 型パラメータ
///
/// * `T` - Float型（f64またはAD互換のDualNumber）
///
/// # 特徴
///
/// - **QE離散化**: Andersen (2008) のQuadratic Exponential離散化スキームを使用
/// - **Feller条件**: 2*kappa*theta > xi^2 を満たす場合、分散は常に正
/// - **分散フロア**: Feller条件が満たされない場合、分散フロアを適用
/// - **AD互換**: ジェネリックFloat型によりnum-dual互換
///
/// # 例
///
/// ```
/// use pricer_models::models::heston::{HestonModel, HestonParams};
///
/// let params = HestonParams::new(
///     100.0,  // スポット価格
///     0.04,   // 初期分散
///     0.04,   // 長期分散
///     1.5,    // 平均回帰速度
///     0.3,    // vol-of-vol
///     -0.7,   // 相関
///     0.05,   // リスクフリーレート
///     1.0,    // 満期
/// ).unwrap();
///
/// let model = HestonModel::new(params).unwrap();
/// assert!(model.check_feller_condition());
/// ```
#[derive(Clone)]
pub struct HestonModel<T: Float> {
    /// モデルパラメータ
    params: HestonParams<T>,
    /// 分散フロア（Feller条件が満たされない場合に使用）
    variance_floor: T,
}

impl<T: Float> std::fmt::Debug for HestonModel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HestonModel")
            .field("params", &self.params)
            .field(
                "variance_floor",
                &self.variance_floor.to_f64().unwrap_or(0.0),
            )
            .finish()
    }
}

impl<T: Float> HestonModel<T> {
    /// 新しいHestonモデルを作成
    ///
    /// パラメータを検証し、Feller条件をチェックする。
    /// Feller条件が満たされない場合、警告ログを出力し、分散フロアを適用する。
    ///
    /// # 引数
    ///
    /// * `params` - Hestonモデルパラメータ
    ///
    /// # 戻り値
    ///
    /// パラメータが有効な場合は`Ok(HestonModel)`、無効な場合は`Err(HestonError)`
    ///
    /// # 例
    ///
    /// ```
    /// use pricer_models::models::heston::{HestonModel, HestonParams};
    ///
    /// let params = HestonParams::new(100.0, 0.04, 0.04, 1.5, 0.3, -0.7, 0.05, 1.0).unwrap();
    /// let model = HestonModel::new(params);
    /// assert!(model.is_ok());
    /// ```
    pub fn new(params: HestonParams<T>) -> Result<Self, HestonError> {
        // パラメータ検証
        params.validate()?;

        // 分散フロアを計算（smoothing_epsilonを使用）
        let variance_floor = params.smoothing_epsilon;

        // Feller条件をチェックし、違反時は警告
        let model = Self {
            params,
            variance_floor,
        };

        if !model.check_feller_condition() {
            // Feller条件違反の警告をログ出力
            // NOTE: ログクレートが利用可能な場合はlog::warn!を使用
            #[cfg(feature = "std")]
            {
                eprintln!(
                    "警告: Feller条件 (2*kappa*theta > xi^2) が満たされていません。\
                     分散フロア {} が適用されます。\
                     kappa={}, theta={}, xi={}",
                    model.variance_floor.to_f64().unwrap_or(0.0),
                    model.params.kappa.to_f64().unwrap_or(0.0),
                    model.params.theta.to_f64().unwrap_or(0.0),
                    model.params.xi.to_f64().unwrap_or(0.0),
                );
            }
        }

        Ok(model)
    }

    /// パラメータを検証
    ///
    /// # 戻り値
    ///
    /// パラメータが有効な場合は`Ok(())`、無効な場合は`Err(HestonError)`
    pub fn validate(&self) -> Result<(), HestonError> {
        self.params.validate()
    }

    /// モデルパラメータへの参照を取得
    ///
    /// # 戻り値
    ///
    /// HestonParamsへの参照
    pub fn params(&self) -> &HestonParams<T> {
        &self.params
    }

    /// Feller条件をチェック (2 * kappa * theta > xi^2)
    ///
    /// Feller条件が満たされる場合、分散過程は常に正を保つ。
    ///
    /// # 戻り値
    ///
    /// Feller条件が満たされる場合は`true`、そうでない場合は`false`
    ///
    /// # 例
    ///
    /// ```
    /// use pricer_models::models::heston::{HestonModel, HestonParams};
    ///
    /// // Feller条件を満たすパラメータ
    /// let params = HestonParams::new(100.0, 0.04, 0.04, 1.5, 0.3, -0.7, 0.05, 1.0).unwrap();
    /// let model = HestonModel::new(params).unwrap();
    /// assert!(model.check_feller_condition());
    /// ```
    pub fn check_feller_condition(&self) -> bool {
        self.params.satisfies_feller()
    }

    /// 分散フロアを取得
    ///
    /// Feller条件が満たされない場合、分散がこの値を下回らないようにする。
    ///
    /// # 戻り値
    ///
    /// 分散フロア値
    pub fn variance_floor(&self) -> T {
        self.variance_floor
    }

    /// 分散フロアを設定
    ///
    /// # 引数
    ///
    /// * `floor` - 新しい分散フロア値（正でなければならない）
    ///
    /// # 戻り値
    ///
    /// 更新されたモデル（ビルダーパターン）
    pub fn with_variance_floor(mut self, floor: T) -> Self {
        if floor > T::zero() {
            self.variance_floor = floor;
        }
        self
    }

    // ================================================================
    // QE離散化スキーム (Andersen 2008)
    // ================================================================

    /// QEスキームの条件付きモーメントを計算
    ///
    /// 分散過程 V_{t+dt} | V_t の条件付き期待値と分散を計算する。
    ///
    /// # Arguments
    /// * `v_current` - 現在の分散
    /// * `dt` - タイムステップ
    ///
    /// # Returns
    /// (m, s2, psi) where:
    /// - m: 条件付き期待値 E[V_{t+dt} | V_t]
    /// - s2: 条件付き分散 Var[V_{t+dt} | V_t]
    /// - psi: s2 / m^2 (スキーム切り替え指標)
    ///
    /// # Mathematical Background
    /// For the CIR variance process:
    /// dV = kappa * (theta - V) * dt + xi * sqrt(V) * dW
    ///
    /// The conditional distribution is non-central chi-squared.
    /// QE scheme matches the first two moments:
    /// - E[V_{t+dt}|V_t] = theta + (V_t - theta) * exp(-kappa * dt)
    /// - Var[V_{t+dt}|V_t] = (V_t * xi^2 * exp(-kappa*dt) / kappa) * (1 - exp(-kappa*dt))
    ///                     + (theta * xi^2 / (2*kappa)) * (1 - exp(-kappa*dt))^2
    pub fn compute_qe_moments(&self, v_current: T, dt: T) -> (T, T, T) {
        let kappa = self.params.kappa;
        let theta = self.params.theta;
        let xi = self.params.xi;

        // exp(-kappa * dt)
        let exp_neg_kappa_dt = (-kappa * dt).exp();
        let one_minus_exp = T::one() - exp_neg_kappa_dt;

        // Conditional mean: E[V_{t+dt} | V_t] = theta + (v_current - theta) * exp(-kappa * dt)
        let m = theta + (v_current - theta) * exp_neg_kappa_dt;

        // Conditional variance (Andersen 2008, Eq. 17)
        // s2 = V_t * (xi^2 * exp(-kappa*dt) / kappa) * (1 - exp(-kappa*dt))
        //    + (theta * xi^2 / (2*kappa)) * (1 - exp(-kappa*dt))^2
        let two = T::from(2.0).unwrap_or(T::one() + T::one());
        let xi_squared = xi * xi;

        let term1 = v_current * xi_squared * exp_neg_kappa_dt * one_minus_exp / kappa;
        let term2 = theta * xi_squared * one_minus_exp * one_minus_exp / (two * kappa);

        let s2 = term1 + term2;

        // psi = s2 / m^2 (ratio of variance to mean squared)
        // Add small epsilon to avoid division by zero
        let eps = self.params.smoothing_epsilon;
        let m_safe = smooth_max(m, eps, eps);
        let psi = s2 / (m_safe * m_safe);

        (m, s2, psi)
    }

    /// QE二次スキーム（psi < psi_c の場合）
    ///
    /// 分散が比較的大きい場合に使用。二次多項式の根として次の分散を計算。
    ///
    /// # Arguments
    /// * `m` - 条件付き期待値
    /// * `s2` - 条件付き分散
    /// * `psi` - s2 / m^2
    /// * `uv` - 一様乱数 U ~ Uniform(0, 1)
    ///
    /// # Returns
    /// 次の分散値 V_{t+dt}
    ///
    /// # Mathematical Background
    /// For psi < psi_c, use moment-matched quadratic:
    /// V_{t+dt} = a * (b + Z_v)^2 where Z_v ~ N(0,1)
    /// with a, b chosen to match m and s2.
    pub fn qe_quadratic_step(&self, m: T, s2: T, psi: T, uv: T) -> T {
        let eps = self.params.smoothing_epsilon;
        let one = T::one();
        let two = T::from(2.0).unwrap_or(one + one);

        // Compute b^2 based on psi
        // For psi in (0, 1]: b^2 = 2/psi - 1 + sqrt(2/psi) * sqrt(2/psi - 1)
        // For psi in (1, psi_c]: b^2 = 2 * (1/psi - 1 + sqrt(1/psi) * sqrt(1/psi - 1))
        //
        // Simplified unified formula (Andersen 2008, Eq. 27):
        // b^2 = 2 * psi^{-1} - 1 + sqrt(2 * psi^{-1}) * sqrt(2 * psi^{-1} - 1)
        //     = (2/psi - 1) + sqrt(2/psi * (2/psi - 1))

        let psi_inv = one / smooth_max(psi, eps, eps);
        let two_psi_inv = two * psi_inv;
        let term_inner = two_psi_inv - one;

        // Ensure non-negative argument for sqrt using smooth_max
        let term_inner_safe = smooth_max(term_inner, T::zero(), eps);
        let sqrt_term = smooth_sqrt(two_psi_inv * term_inner_safe, eps);

        let b_squared = term_inner_safe + sqrt_term;

        // b = sqrt(b^2) - ensure non-negative
        let b = smooth_sqrt(b_squared, eps);

        // a = m / (1 + b^2)
        let a = m / (one + b_squared);

        // Convert uniform to normal using inverse CDF approximation
        // Z_v = Phi^{-1}(uv) ≈ rational approximation
        let z_v = self.inverse_normal_cdf(uv);

        // V_{t+dt} = a * (b + Z_v)^2
        let b_plus_z = b + z_v;
        let v_next = a * b_plus_z * b_plus_z;

        // Ensure non-negative using smooth_max
        smooth_max(v_next, T::zero(), eps)
    }

    /// QE指数スキーム（psi >= psi_c の場合）
    ///
    /// 分散が小さい場合に使用。ゼロ質量を持つ混合分布で次の分散を計算。
    ///
    /// # Arguments
    /// * `m` - 条件付き期待値
    /// * `psi` - s2 / m^2
    /// * `uv` - 一様乱数 U ~ Uniform(0, 1)
    ///
    /// # Returns
    /// 次の分散値 V_{t+dt}
    ///
    /// # Mathematical Background
    /// For psi >= psi_c, use exponential martingale with probability mass at zero:
    /// V_{t+dt} = psi^{-1}(U_v; p, beta) where
    /// - p = (psi - 1) / (psi + 1)
    /// - beta = (1 - p) / m = 2 / (m * (psi + 1))
    pub fn qe_exponential_step(&self, m: T, psi: T, uv: T) -> T {
        let eps = self.params.smoothing_epsilon;
        let one = T::one();
        let two = T::from(2.0).unwrap_or(one + one);

        // p = (psi - 1) / (psi + 1) - probability of zero
        let psi_safe = smooth_max(psi, eps, eps);
        let p = (psi_safe - one) / (psi_safe + one);

        // Clamp p to [0, 1)
        let p_clamped = smooth_max(p, T::zero(), eps);
        let _p_final = smooth_max(one - p_clamped, eps, eps); // 1 - p > 0 (used for validation)

        // beta = 2 / (m * (psi + 1))
        let m_safe = smooth_max(m, eps, eps);
        let beta = two / (m_safe * (psi_safe + one));

        // Inverse CDF of the mixture distribution:
        // if U <= p: V = 0
        // else: V = -ln((1 - U) / (1 - p)) / beta
        //
        // Using smooth_indicator for differentiability:
        // V = smooth_indicator(uv - p) * (-ln((1 - uv) / (1 - p)) / beta)

        let one_minus_uv = smooth_max(one - uv, eps, eps);
        let one_minus_p = smooth_max(one - p_clamped, eps, eps);
        let log_ratio = (one_minus_uv / one_minus_p).ln();

        // Exponential inverse CDF: -ln(U') / beta where U' = (1-U)/(1-p)
        let v_exp = smooth_max(-log_ratio / beta, T::zero(), eps);

        // Smooth blend: if uv <= p, return 0; else return v_exp
        let indicator = smooth_indicator(uv - p_clamped, eps);
        let v_next = indicator * v_exp;

        // Ensure non-negative
        smooth_max(v_next, T::zero(), eps)
    }

    /// QE分散ステップ（二次/指数スキームの滑らかなブレンド）
    ///
    /// psi値に基づいてスキームを滑らかに切り替える。
    ///
    /// # Arguments
    /// * `v_current` - 現在の分散
    /// * `dt` - タイムステップ
    /// * `uv` - 一様乱数 U ~ Uniform(0, 1)
    ///
    /// # Returns
    /// 次の分散値 V_{t+dt}
    pub fn qe_variance_step(&self, v_current: T, dt: T, uv: T) -> T {
        let (m, s2, psi) = self.compute_qe_moments(v_current, dt);
        let psi_c = self.params.psi_c;
        let eps = self.params.smoothing_epsilon;

        // Compute both schemes
        let v_quadratic = self.qe_quadratic_step(m, s2, psi, uv);
        let v_exponential = self.qe_exponential_step(m, psi, uv);

        // Smooth blend based on psi relative to psi_c
        // indicator = 0 when psi < psi_c (use quadratic)
        // indicator = 1 when psi >= psi_c (use exponential)
        let indicator = smooth_indicator(psi - psi_c, eps);

        // Blend: v_next = (1 - indicator) * v_quadratic + indicator * v_exponential
        let one = T::one();
        let v_next = (one - indicator) * v_quadratic + indicator * v_exponential;

        // Apply variance floor using smooth_max
        smooth_max(v_next, self.variance_floor, eps)
    }

    /// 相関ブラウン運動を生成（Cholesky分解）
    ///
    /// 独立な標準正規乱数から相関のあるブラウン運動増分を生成する。
    ///
    /// # Arguments
    /// * `z1` - 独立標準正規乱数（価格用）
    /// * `z2` - 独立標準正規乱数（分散用）
    ///
    /// # Returns
    /// (dW_S, dW_V) - 相関のあるブラウン運動増分
    ///
    /// # Mathematical Background
    /// Using Cholesky decomposition:
    /// dW_S = z1
    /// dW_V = rho * z1 + sqrt(1 - rho^2) * z2
    pub fn generate_correlated_brownian(&self, z1: T, z2: T) -> (T, T) {
        let rho = self.params.rho;
        let eps = self.params.smoothing_epsilon;

        // dW_S = z1 (unchanged)
        let dw_s = z1;

        // dW_V = rho * z1 + sqrt(1 - rho^2) * z2
        let one = T::one();
        let one_minus_rho_sq = one - rho * rho;

        // Use smooth_sqrt to handle rho = +/- 1 case smoothly
        let sqrt_term = smooth_sqrt(one_minus_rho_sq, eps);
        let dw_v = rho * z1 + sqrt_term * z2;

        (dw_s, dw_v)
    }

    /// QE価格ステップ（中間点規則）
    ///
    /// 分散の中間点を使用して価格を更新する。
    ///
    /// # Arguments
    /// * `s_current` - 現在の価格
    /// * `v_current` - 現在の分散
    /// * `v_next` - 次の分散
    /// * `dt` - タイムステップ
    /// * `dw_s` - 価格用ブラウン運動増分
    ///
    /// # Returns
    /// 次の価格 S_{t+dt}
    ///
    /// # Mathematical Background
    /// Mid-point discretization for log-price:
    /// ln(S_{t+dt}) = ln(S_t) + (r - V_avg/2) * dt + sqrt(V_avg * dt) * dW_S
    /// where V_avg = (V_t + V_{t+dt}) / 2
    pub fn qe_price_step(&self, s_current: T, v_current: T, v_next: T, dt: T, dw_s: T) -> T {
        let rate = self.params.rate;
        let eps = self.params.smoothing_epsilon;

        // Mid-point variance averaging
        let two = T::from(2.0).unwrap_or(T::one() + T::one());
        let v_avg = (v_current + v_next) / two;

        // Ensure positive variance using smooth_max
        let v_avg_safe = smooth_max(v_avg, eps, eps);

        // Log-price dynamics:
        // d(ln S) = (r - V/2) * dt + sqrt(V) * dW_S
        let drift = (rate - v_avg_safe / two) * dt;
        let volatility = smooth_sqrt(v_avg_safe, eps);
        let diffusion = volatility * dt.sqrt() * dw_s;

        // S_{t+dt} = S_t * exp(drift + diffusion)
        let log_return = drift + diffusion;
        let s_next = s_current * log_return.exp();

        // Ensure positive price using smooth_max
        smooth_max(s_next, eps, eps)
    }

    /// QE離散化の1ステップ（分散 + 価格）
    ///
    /// Andersen (2008) QEスキームによる完全な1ステップシミュレーション。
    ///
    /// # Arguments
    /// * `s_current` - 現在の価格
    /// * `v_current` - 現在の分散
    /// * `dt` - タイムステップ
    /// * `z1` - 標準正規乱数（価格用）
    /// * `z2` - 標準正規乱数（分散用）
    /// * `uv` - 一様乱数（QEスキーム用）
    ///
    /// # Returns
    /// (S_{t+dt}, V_{t+dt}) - 次のステップの価格と分散
    ///
    /// # Example
    /// ```
    /// use pricer_models::models::heston::{HestonModel, HestonParams};
    ///
    /// let params = HestonParams::new(100.0, 0.04, 0.04, 1.5, 0.3, -0.7, 0.05, 1.0).unwrap();
    /// let model = HestonModel::new(params).unwrap();
    ///
    /// let (s_next, v_next) = model.qe_step(100.0, 0.04, 1.0/252.0, 0.5, 0.0, 0.5);
    /// assert!(s_next > 0.0);
    /// assert!(v_next >= 0.0);
    /// ```
    pub fn qe_step(
        &self,
        s_current: T,
        v_current: T,
        dt: T,
        z1: T,
        z2: T,
        uv: T,
    ) -> (T, T) {
        // Step 1: Update variance using QE scheme
        let v_next = self.qe_variance_step(v_current, dt, uv);

        // Step 2: Generate correlated Brownian motion
        let (dw_s, _dw_v) = self.generate_correlated_brownian(z1, z2);

        // Step 3: Update price using mid-point rule
        let s_next = self.qe_price_step(s_current, v_current, v_next, dt, dw_s);

        (s_next, v_next)
    }

    /// 標準正規分布の逆CDF（近似）
    ///
    /// Beasley-Springer-Moro近似を使用して一様乱数を標準正規乱数に変換。
    ///
    /// # Arguments
    /// * `u` - 一様乱数 U ~ Uniform(0, 1)
    ///
    /// # Returns
    /// Z ~ N(0, 1)
    fn inverse_normal_cdf(&self, u: T) -> T {
        // Beasley-Springer-Moro algorithm coefficients
        let a = [
            T::from(2.50662823884).unwrap_or(T::zero()),
            T::from(-18.61500062529).unwrap_or(T::zero()),
            T::from(41.39119773534).unwrap_or(T::zero()),
            T::from(-25.44106049637).unwrap_or(T::zero()),
        ];
        let b = [
            T::from(-8.47351093090).unwrap_or(T::zero()),
            T::from(23.08336743743).unwrap_or(T::zero()),
            T::from(-21.06224101826).unwrap_or(T::zero()),
            T::from(3.13082909833).unwrap_or(T::zero()),
        ];
        let c = [
            T::from(0.3374754822726147).unwrap_or(T::zero()),
            T::from(0.9761690190917186).unwrap_or(T::zero()),
            T::from(0.1607979714918209).unwrap_or(T::zero()),
            T::from(0.0276438810333863).unwrap_or(T::zero()),
            T::from(0.0038405729373609).unwrap_or(T::zero()),
            T::from(0.0003951896511919).unwrap_or(T::zero()),
            T::from(0.0000321767881768).unwrap_or(T::zero()),
            T::from(0.0000002888167364).unwrap_or(T::zero()),
            T::from(0.0000003960315187).unwrap_or(T::zero()),
        ];

        let half = T::from(0.5).unwrap_or(T::zero());
        let eps = self.params.smoothing_epsilon;

        // Clamp u to (eps, 1-eps) to avoid infinities
        let one = T::one();
        let u_clamped = smooth_max(smooth_max(u, eps, eps), one - eps, eps);
        let u_safe = if u_clamped > one - eps {
            one - eps
        } else if u_clamped < eps {
            eps
        } else {
            u_clamped
        };

        let y = u_safe - half;

        // Central region: |y| <= 0.42
        let threshold = T::from(0.42).unwrap_or(half);
        let y_abs = if y < T::zero() { -y } else { y };

        if y_abs <= threshold {
            // Rational approximation for central region
            let r = y * y;
            let numer = a[0] + r * (a[1] + r * (a[2] + r * a[3]));
            let denom = one + r * (b[0] + r * (b[1] + r * (b[2] + r * b[3])));
            y * numer / denom
        } else {
            // Tail approximation
            let r = if y < T::zero() { u_safe } else { one - u_safe };
            let r_safe = smooth_max(r, eps, eps);
            let s = (-r_safe.ln()).ln();

            let z = c[0]
                + s * (c[1]
                    + s * (c[2]
                        + s * (c[3]
                            + s * (c[4] + s * (c[5] + s * (c[6] + s * (c[7] + s * c[8])))))));

            if y < T::zero() {
                -z
            } else {
                z
            }
        }
    }
}

/// DifferentiableマーカートレイトをHestonModelに実装
///
/// これによりStochasticModelトレイトの実装が可能になる。
impl<T: Float> Differentiable for HestonModel<T> {}

// ================================================================
// Task 3.4: StochasticModelトレイト実装
// ================================================================

use super::stochastic::{StochasticModel, TwoFactorState};

/// HestonModelのStochasticModelトレイト実装
///
/// Hestonモデルは2ファクターモデルとして実装される:
/// - State: `TwoFactorState<T>` - (価格, 分散)
/// - Params: `HestonParams<T>` - モデルパラメータ
/// - brownian_dim: 2 (相関ブラウン運動用に2次元 + 1次元一様乱数)
///
/// # evolve_stepの入力形式
///
/// `dw`スライスは以下の3要素を期待:
/// - `dw[0]`: 標準正規乱数 z1 (価格用)
/// - `dw[1]`: 標準正規乱数 z2 (分散用、相関変換に使用)
/// - `dw[2]`: 一様乱数 uv (QEスキーム用、0-1の範囲)
///
/// # 使用例
///
/// ```
/// use pricer_models::models::heston::{HestonModel, HestonParams};
/// use pricer_models::models::stochastic::StochasticModel;
///
/// let params = HestonParams::new(100.0, 0.04, 0.04, 1.5, 0.3, -0.7, 0.05, 1.0).unwrap();
/// let state = HestonModel::initial_state(&params);
///
/// let dt = 1.0 / 252.0;
/// let dw = [0.5, 0.0, 0.5]; // z1, z2, uv
///
/// let next_state = HestonModel::evolve_step(state, dt, &dw, &params);
/// assert!(next_state.first > 0.0);  // 価格は正
/// assert!(next_state.second >= 0.0); // 分散は非負
/// ```
impl<T: Float + Default> StochasticModel<T> for HestonModel<T> {
    /// 2ファクター状態: (価格, 分散)
    type State = TwoFactorState<T>;

    /// Hestonモデルパラメータ
    type Params = HestonParams<T>;

    /// 1タイムステップの状態遷移（QE離散化スキーム使用）
    ///
    /// # Arguments
    /// * `state` - 現在の状態 (price, variance)
    /// * `dt` - タイムステップ
    /// * `dw` - 乱数スライス: [z1 (normal), z2 (normal), uv (uniform)]
    /// * `params` - モデルパラメータ
    ///
    /// # Returns
    /// 次の状態 (next_price, next_variance)
    fn evolve_step(state: Self::State, dt: T, dw: &[T], params: &Self::Params) -> Self::State {
        // 一時的なモデルインスタンスを作成してQEステップを実行
        // NOTE: HestonModel::newはResultを返すが、paramsは既に検証済みと仮定
        let variance_floor = params.smoothing_epsilon;

        // dw[0] = z1 (price normal)
        // dw[1] = z2 (variance normal)
        // dw[2] = uv (uniform for QE scheme)
        let z1 = dw.first().copied().unwrap_or(T::zero());
        let z2 = dw.get(1).copied().unwrap_or(T::zero());
        let uv = dw.get(2).copied().unwrap_or(T::from(0.5).unwrap_or(T::zero()));

        // QEステップを実行
        let model = HestonModel {
            params: *params,
            variance_floor,
        };

        let (next_price, next_variance) =
            model.qe_step(state.first, state.second, dt, z1, z2, uv);

        TwoFactorState {
            first: next_price,
            second: next_variance,
        }
    }

    /// 初期状態を返す (spot, v0)
    ///
    /// # Arguments
    /// * `params` - モデルパラメータ
    ///
    /// # Returns
    /// 初期状態: (spot price, initial variance)
    fn initial_state(params: &Self::Params) -> Self::State {
        TwoFactorState {
            first: params.spot,
            second: params.v0,
        }
    }

    /// 必要なブラウン運動の次元数
    ///
    /// Hestonモデルは2次元のブラウン運動を使用:
    /// - 1次元: 価格過程
    /// - 1次元: 分散過程（相関付き）
    ///
    /// 実際の`dw`スライスは3要素（z1, z2, uv）を期待するが、
    /// brownian_dimは独立なブラウン運動の数を返す。
    fn brownian_dim() -> usize {
        2
    }

    /// モデル名
    fn model_name() -> &'static str {
        "Heston"
    }

    /// 確率ファクター数
    ///
    /// Hestonモデルは2ファクターモデル:
    /// - 1: 資産価格過程
    /// - 2: 分散過程
    fn num_factors() -> usize {
        2
    }
}

// PricingErrorへの変換を実装
impl From<HestonError> for pricer_core::types::PricingError {
    fn from(err: HestonError) -> Self {
        match err {
            HestonError::InvalidSpot(v) => {
                pricer_core::types::PricingError::InvalidInput(format!(
                    "無効なスポット価格: S0 = {}",
                    v
                ))
            }
            HestonError::InvalidV0(v) => {
                pricer_core::types::PricingError::InvalidInput(format!(
                    "無効な初期分散: v0 = {}",
                    v
                ))
            }
            HestonError::InvalidTheta(v) => {
                pricer_core::types::PricingError::InvalidInput(format!(
                    "無効な長期分散: theta = {}",
                    v
                ))
            }
            HestonError::InvalidKappa(v) => {
                pricer_core::types::PricingError::InvalidInput(format!(
                    "無効な平均回帰速度: kappa = {}",
                    v
                ))
            }
            HestonError::InvalidXi(v) => {
                pricer_core::types::PricingError::InvalidInput(format!(
                    "無効なvol-of-vol: xi = {}",
                    v
                ))
            }
            HestonError::InvalidRho(v) => {
                pricer_core::types::PricingError::InvalidInput(format!(
                    "無効な相関係数: rho = {}",
                    v
                ))
            }
            HestonError::InvalidMaturity(v) => {
                pricer_core::types::PricingError::InvalidInput(format!(
                    "無効な満期: T = {}",
                    v
                ))
            }
            HestonError::InvalidPsiC(v) => {
                pricer_core::types::PricingError::InvalidInput(format!(
                    "無効なQE閾値: psi_c = {}",
                    v
                ))
            }
            HestonError::InvalidEpsilon(v) => {
                pricer_core::types::PricingError::InvalidInput(format!(
                    "無効なsmoothing epsilon: {}",
                    v
                ))
            }
            HestonError::NumericalInstability(msg) => {
                pricer_core::types::PricingError::NumericalInstability(msg)
            }
            HestonError::NonFinite(msg) => {
                pricer_core::types::PricingError::NumericalInstability(format!(
                    "非有限値検出: {}",
                    msg
                ))
            }
        }
    }
}
