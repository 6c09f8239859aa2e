//! ユースケース間で共有するヘルパー

use wavvy_infra::TokenStore;

/// 保存済みトークンを破棄する
///
/// 認可エラーの処理中に呼ばれるため、削除の失敗はログに残すだけで呼び出し元には返さない。
pub(crate) async fn discard_token(tokens: &dyn TokenStore) {
    match tokens.clear().await {
        Ok(()) => tracing::info!("保存済みトークンを破棄しました"),
        Err(e) => tracing::error!(error = %e, "トークンの破棄に失敗しました"),
    }
}
