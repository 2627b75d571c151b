use std::net::ToSocketAddrs;

use tiberius::{Client, SqlBrowser};
use tokio::net::TcpStream;
use tokio_util::compat::TokioAsyncWriteCompatExt;

use super::config::{MssqlClient, MssqlOptions};
use crate::error::MiddlewareDbError;

/// Open a new TDS connection.
///
/// # Errors
/// Returns `MiddlewareDbError::ConnectionError` if address resolution or the
/// TCP connect fails, and `MiddlewareDbError::MssqlError` if the SQL Browser
/// lookup or the TDS login fails.
pub async fn create_mssql_client(opts: &MssqlOptions) -> Result<MssqlClient, MiddlewareDbError> {
    let config = opts.tiberius_config();

    // Named instances are located through the SQL Browser service.
    if opts.instance_name.is_some() {
        let tcp = TcpStream::connect_named(&config).await?;
        return connect_client(config, tcp).await;
    }

    let port = opts.port_or_default();

    let server_addr = (opts.server.as_str(), port)
        .to_socket_addrs()
        .map_err(|e| {
            MiddlewareDbError::ConnectionError(format!("Failed to resolve server address: {e}"))
        })?
        .next()
        .ok_or_else(|| {
            let server = &opts.server;
            MiddlewareDbError::ConnectionError(format!("No valid address found for {server}"))
        })?;

    let tcp = TcpStream::connect(server_addr)
        .await
        .map_err(|e| MiddlewareDbError::ConnectionError(format!("TCP connection error: {e}")))?;
    connect_client(config, tcp).await
}

async fn connect_client(
    config: tiberius::Config,
    tcp: TcpStream,
) -> Result<MssqlClient, MiddlewareDbError> {
    tcp.set_nodelay(true)
        .map_err(|e| MiddlewareDbError::ConnectionError(format!("TCP option error: {e}")))?;
    Ok(Client::connect(config, tcp.compat_write()).await?)
}
