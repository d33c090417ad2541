//! Erros do sistema de arquivos, da formatação e da montagem.

use crate::drivers::block::BlockError;
use core::fmt;

/// Erros de diretório e de arquivo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    /// Entrada não existe (ou é um diretório)
    NotFound,
    /// Já existe entrada com esse nome
    AlreadyExists,
    /// Nenhum slot livre no diretório raiz
    DirectoryFull,
    /// Nenhum cluster livre
    NoSpace,
    /// Bloco fora do RAM disk
    InvalidBlock,
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsError::NotFound => write!(f, "Arquivo não encontrado"),
            FsError::AlreadyExists => write!(f, "Arquivo já existe"),
            FsError::DirectoryFull => write!(f, "Diretório cheio"),
            FsError::NoSpace => write!(f, "Sem espaço livre"),
            FsError::InvalidBlock => write!(f, "Bloco inválido"),
        }
    }
}

impl From<BlockError> for FsError {
    fn from(_: BlockError) -> Self {
        FsError::InvalidBlock
    }
}

/// Erros de cópia, um por etapa
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyError {
    SourceNotFound,
    DestExists,
    ReadFailed,
    CreateFailed,
    /// Escrita falhou; o destino criado foi removido
    WriteFailed,
}

impl fmt::Display for CopyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyError::SourceNotFound => write!(f, "Origem não encontrada"),
            CopyError::DestExists => write!(f, "Destino já existe"),
            CopyError::ReadFailed => write!(f, "Falha ao ler a origem"),
            CopyError::CreateFailed => write!(f, "Falha ao criar o destino"),
            CopyError::WriteFailed => write!(f, "Falha ao escrever o destino"),
        }
    }
}

/// Erros de formatação
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// Drive ausente, sem capacidade ou somente leitura
    InvalidDrive,
    /// Escrita de setor falhou (formatação parcial, não desfeita)
    WriteFailed,
    /// Tamanho sem classe de mídia
    Unsupported,
    /// Além do alcance LBA28
    TooLarge,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::InvalidDrive => write!(f, "Drive inválido"),
            FormatError::WriteFailed => write!(f, "Falha de escrita no disco"),
            FormatError::Unsupported => write!(f, "Mídia não suportada"),
            FormatError::TooLarge => write!(f, "Drive grande demais (limite LBA28)"),
        }
    }
}

impl From<BlockError> for FormatError {
    fn from(_: BlockError) -> Self {
        FormatError::WriteFailed
    }
}

/// Erros de montagem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountError {
    InvalidDrive,
    NotFormatted,
    /// Volume sem espaço para a imagem do RAM disk
    UnsupportedFs,
    /// Leitura/escrita da imagem falhou
    IoError,
    /// Nenhum slot livre na tabela
    TableFull,
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MountError::InvalidDrive => write!(f, "Drive inválido"),
            MountError::NotFormatted => write!(f, "Drive não formatado"),
            MountError::UnsupportedFs => write!(f, "Sistema de arquivos não suportado"),
            MountError::IoError => write!(f, "Erro de I/O"),
            MountError::TableFull => write!(f, "Tabela de montagem cheia"),
        }
    }
}

impl From<BlockError> for MountError {
    fn from(_: BlockError) -> Self {
        MountError::IoError
    }
}
