use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::Atom;
use crate::core::models::molecule::Molecule;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
    #[error("File declares {declared} atoms but contains {found}")]
    AtomCountMismatch { declared: usize, found: usize },
    #[error("File is empty")]
    Empty,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum XyzParseErrorKind {
    #[error("Invalid atom count (value: '{0}')")]
    InvalidCount(String),
    #[error("Invalid coordinate (value: '{0}')")]
    InvalidFloat(String),
    #[error("Atom line needs a symbol and three coordinates")]
    MissingField,
}

/// The plain XYZ format: an atom count, a comment line, then `symbol x y z` lines.
///
/// Blank lines after the declared atoms are ignored; anything else beyond them is
/// reported as a count mismatch.
pub struct XyzFile;

fn parse_coordinate(value: &str, line: usize) -> Result<f64, XyzError> {
    value.parse().map_err(|_| XyzError::Parse {
        line,
        kind: XyzParseErrorKind::InvalidFloat(value.to_string()),
    })
}

impl MolecularFile for XyzFile {
    type Error = XyzError;

    fn read_from(reader: &mut impl BufRead) -> Result<Molecule, Self::Error> {
        let mut lines = reader.lines().enumerate().map(|(idx, line)| (idx + 1, line));

        let (count_line, count) = lines.next().ok_or(XyzError::Empty)?;
        let count = count?;
        let declared: usize = count.trim().parse().map_err(|_| XyzError::Parse {
            line: count_line,
            kind: XyzParseErrorKind::InvalidCount(count.trim().to_string()),
        })?;

        let title = match lines.next() {
            Some((_, line)) => line?.trim().to_string(),
            None => String::new(),
        };

        let mut atoms = Vec::with_capacity(declared);
        for (line_num, line) in lines {
            let line = line?;
            let mut fields = line.split_whitespace();
            let Some(symbol) = fields.next() else {
                continue;
            };
            if atoms.len() == declared {
                return Err(XyzError::AtomCountMismatch {
                    declared,
                    found: declared + 1,
                });
            }

            let mut coord = || {
                fields
                    .next()
                    .ok_or(XyzError::Parse {
                        line: line_num,
                        kind: XyzParseErrorKind::MissingField,
                    })
                    .and_then(|value| parse_coordinate(value, line_num))
            };
            let (x, y, z) = (coord()?, coord()?, coord()?);
            atoms.push(Atom::from_xyz(symbol, x, y, z));
        }

        if atoms.len() != declared {
            return Err(XyzError::AtomCountMismatch {
                declared,
                found: atoms.len(),
            });
        }

        Ok(Molecule { title, atoms })
    }

    fn write_to(molecule: &Molecule, writer: &mut impl Write) -> Result<(), Self::Error> {
        writeln!(writer, "{}", molecule.n_atoms())?;
        writeln!(writer, "{}", molecule.title)?;
        for atom in &molecule.atoms {
            writeln!(
                writer,
                "{:<4}{:>15.5}{:>15.5}{:>15.5}",
                atom.symbol, atom.position.x, atom.position.y, atom.position.z
            )?;
        }
        Ok(())
    }
}
