use std::path::PathBuf;

use clap::Parser;

/// Configurazione da linea di comando
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Identificativo dell'unico utente autorizzato
    #[arg(long)]
    pub owner_id: i64,

    /// Unità navigabili (ripetibile); di default quelle della piattaforma
    #[arg(long = "drive")]
    pub drives: Vec<PathBuf>,

    /// Elementi per pagina negli elenchi
    #[arg(long, default_value = "10")]
    pub page_size: usize,

    /// Dimensione massima di un trasferimento (in bytes)
    #[arg(long, default_value = "2147483648")]
    pub max_transfer_size: u64,

    /// Avanzamento minimo, in punti percentuali, tra due aggiornamenti
    #[arg(long, default_value = "5.0")]
    pub progress_threshold: f64,

    /// Intervallo minimo tra due aggiornamenti (in secondi)
    #[arg(long, default_value = "3.0")]
    pub progress_interval_secs: f64,

    /// Numero massimo di handle in memoria (0 = illimitato)
    #[arg(long, default_value = "0")]
    pub max_handles: usize,

    /// Directory in cui la console deposita i file inviati
    #[arg(long, default_value = "./outbox")]
    pub outbox: PathBuf,

    /// Dimensione del blocco di copia della console (in bytes)
    #[arg(long, default_value = "65536")]
    pub chunk_size: usize,
}
